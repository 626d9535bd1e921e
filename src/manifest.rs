//! The chapter manifest, `chapters.json`.
//!
//! A JSON array of chapter objects, each with an `id` and optionally a
//! `title` or any other field the site uses:
//!
//! ```json
//! [{"id": "01", "title": "Getting started"}, {"id": "02"}]
//! ```
//!
//! The manifest decides which per-chapter files the site loads and in what
//! order; `split` can write one and `join` reads one.

use crate::output::ChapterCollection;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ManifestEntry {
    #[serde(skip)]
    id: String,
    fields: Map<String, Value>,
}

impl ManifestEntry {
    /// A fresh entry holding only `id`.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::String(id.clone()));
        Self { id, fields }
    }

    /// Read an entry from a manifest element.
    ///
    /// The element must be an object whose `id` is a non-empty string or a
    /// number; numbers are used in their printed form.
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let id = match fields.get("id")? {
            Value::String(s) if !s.is_empty() => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        Some(Self {
            id,
            fields: fields.clone(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

/// Parse a manifest document.
///
/// Returns `None` unless `doc` is a non-empty array; elements that are not
/// usable entries are dropped.
pub fn parse_manifest(doc: &Value) -> Option<Vec<ManifestEntry>> {
    let items = doc.as_array().filter(|a| !a.is_empty())?;
    let entries: Vec<ManifestEntry> = items.iter().filter_map(ManifestEntry::from_value).collect();
    if entries.len() < items.len() {
        debug!(
            "Manifest: ignored {} entries without a usable id",
            items.len() - entries.len()
        );
    }
    Some(entries)
}

/// One entry per chapter of `chapters`, in first-seen order.
///
/// When `existing` has an entry with the same id, that entry is reused so
/// titles and other hand-written fields survive a re-split. Existing entries
/// for chapters that no longer have slides are dropped.
pub fn build_manifest(chapters: &ChapterCollection, existing: &[ManifestEntry]) -> Vec<ManifestEntry> {
    chapters
        .ids()
        .map(|id| {
            existing
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .unwrap_or_else(|| ManifestEntry::new(id))
        })
        .collect()
}

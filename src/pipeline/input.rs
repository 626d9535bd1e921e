//! Input loading: read a JSON document and classify its top-level shape.
//!
//! A slides document is either already flat (an array) or chapter-keyed (an
//! object). Anything else is rejected here, before the core ever sees it, so
//! the pure stages can assume well-shaped input.

use crate::error::{kind_of, MigrateError, Result};
use crate::record::SlideRecord;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// The two document shapes the migration understands.
#[derive(Debug, Clone, PartialEq)]
pub enum SlidesDocument {
    /// An array of slides; already converted.
    Flat(Vec<Value>),
    /// `{chapter: [slides…] | {key: slide…}}`.
    Chaptered(Map<String, Value>),
}

impl SlidesDocument {
    /// Classify a parsed document. `path` is only used in the error.
    pub fn from_value(value: Value, path: &Path) -> Result<Self> {
        match value {
            Value::Array(items) => Ok(Self::Flat(items)),
            Value::Object(chapters) => Ok(Self::Chaptered(chapters)),
            other => Err(MigrateError::UnexpectedShape {
                path: path.to_path_buf(),
                found: kind_of(&other),
            }),
        }
    }
}

/// Read and classify the document at `path`.
pub fn load_document(path: &Path) -> Result<SlidesDocument> {
    let value = read_json(path)?;
    let doc = SlidesDocument::from_value(value, path)?;
    match &doc {
        SlidesDocument::Flat(items) => debug!("{}: flat array of {} entries", path.display(), items.len()),
        SlidesDocument::Chaptered(ch) => debug!("{}: {} chapters", path.display(), ch.len()),
    }
    Ok(doc)
}

/// Read `path` as a flat array of slide records.
///
/// Entries that are not objects are dropped with a warning; the second
/// element of the result counts them.
pub fn load_flat(path: &Path) -> Result<(Vec<SlideRecord>, usize)> {
    match read_json(path)? {
        Value::Array(items) => Ok(records_from(items, path)),
        other => Err(MigrateError::NotFlat {
            path: path.to_path_buf(),
            found: kind_of(&other),
        }),
    }
}

/// Keep the object entries of a flat array.
pub fn records_from(items: Vec<Value>, path: &Path) -> (Vec<SlideRecord>, usize) {
    let total = items.len();
    let mut records = Vec::with_capacity(total);
    for (i, item) in items.into_iter().enumerate() {
        match SlideRecord::try_from(item) {
            Ok(record) => records.push(record),
            Err(other) => warn!(
                "{}: entry {} is {}, not a slide; skipped",
                path.display(),
                i + 1,
                kind_of(&other)
            ),
        }
    }
    let skipped = total - records.len();
    (records, skipped)
}

/// Read and parse a JSON file, mapping I/O failures to [`MigrateError`].
pub fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => MigrateError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => MigrateError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => MigrateError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    // Editors on Windows like to leave a BOM in front of the JSON.
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);

    serde_json::from_str(text).map_err(|e| MigrateError::InvalidJson {
        path: path.to_path_buf(),
        line: e.line(),
        column: e.column(),
        detail: e.to_string(),
    })
}

//! Result types returned by the migration functions.

use crate::error::ItemIssue;
use crate::record::SlideRecord;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;

// ── Flatten ──────────────────────────────────────────────────────────────

/// Everything a flatten run produced.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct FlattenOutput {
    /// Normalised records, chapter-major then item-minor.
    pub slides: Vec<SlideRecord>,
    /// Skipped items and lexicographic fallbacks, in encounter order.
    pub issues: Vec<ItemIssue>,
    /// Number of chapters walked.
    pub chapters: usize,
    /// Number of items seen, including skipped ones.
    pub items: usize,
    /// Id base used for generated ids in this run.
    pub id_base: String,
}

impl FlattenOutput {
    /// Items that were dropped because they were not records.
    pub fn skipped(&self) -> usize {
        self.items - self.slides.len()
    }
}

// ── Partition ────────────────────────────────────────────────────────────

/// One chapter's slides.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Chapter {
    pub id: String,
    pub slides: Vec<SlideRecord>,
}

/// Slides grouped by chapter, in the order chapters were first seen.
///
/// Serialises as a JSON object `{chapter: [slides…]}` with keys in that
/// order, i.e. the chapter-keyed document shape.
#[derive(Debug, Clone, Default)]
pub struct ChapterCollection {
    chapters: Vec<Chapter>,
    index: HashMap<String, usize>,
}

impl ChapterCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to chapter `id`, creating the chapter at the end
    /// if it has not been seen yet.
    pub fn push(&mut self, id: impl Into<String>, record: SlideRecord) {
        let id = id.into();
        match self.index.get(&id) {
            Some(&pos) => self.chapters[pos].slides.push(record),
            None => {
                self.index.insert(id.clone(), self.chapters.len());
                self.chapters.push(Chapter {
                    id,
                    slides: vec![record],
                });
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Chapter> {
        self.index.get(id).map(|&pos| &self.chapters[pos])
    }

    /// Chapter ids in first-seen order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.chapters.iter().map(|c| c.id.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chapter> {
        self.chapters.iter()
    }

    /// Number of chapters.
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Number of slides across all chapters.
    pub fn total_slides(&self) -> usize {
        self.chapters.iter().map(|c| c.slides.len()).sum()
    }

    /// The chapter-keyed JSON object, ready to flatten again.
    pub fn to_map(&self) -> Map<String, Value> {
        self.chapters
            .iter()
            .map(|c| {
                let slides = c.slides.iter().cloned().map(SlideRecord::into_value).collect();
                (c.id.clone(), Value::Array(slides))
            })
            .collect()
    }
}

impl PartialEq for ChapterCollection {
    fn eq(&self, other: &Self) -> bool {
        self.chapters == other.chapters
    }
}

impl IntoIterator for ChapterCollection {
    type Item = Chapter;
    type IntoIter = std::vec::IntoIter<Chapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.chapters.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChapterCollection {
    type Item = &'a Chapter;
    type IntoIter = std::slice::Iter<'a, Chapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.chapters.iter()
    }
}

impl Serialize for ChapterCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.chapters.len()))?;
        for chapter in &self.chapters {
            map.serialize_entry(&chapter.id, &chapter.slides)?;
        }
        map.end()
    }
}

// ── File-level stats ─────────────────────────────────────────────────────

/// Statistics for a `convert` run that wrote output.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConversionStats {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// `None` when backups were disabled.
    pub backup_path: Option<PathBuf>,
    pub chapters: usize,
    pub slides: usize,
    pub skipped: usize,
    pub issues: Vec<ItemIssue>,
    pub id_base: String,
    pub total_duration_ms: u64,
}

/// What `convert_file` did.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConvertOutcome {
    /// The document was already a flat array; nothing was written.
    AlreadyFlat { path: PathBuf, slides: usize },
    /// The chapter object was flattened and written.
    Converted(ConversionStats),
}

/// One per-chapter file written by `split` or read by `join`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ChapterFile {
    pub chapter: String,
    pub path: PathBuf,
    pub slides: usize,
}

/// Statistics for a `split` run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SplitStats {
    pub input_path: PathBuf,
    /// Files written, in first-seen chapter order.
    pub files: Vec<ChapterFile>,
    /// Array entries that were not records and were left out.
    pub skipped: usize,
    pub manifest_path: Option<PathBuf>,
    /// Backups of files that were overwritten.
    pub backups: Vec<PathBuf>,
}

impl SplitStats {
    pub fn total_slides(&self) -> usize {
        self.files.iter().map(|f| f.slides).sum()
    }
}

/// Where `join` found its slides.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinSource {
    /// Per-chapter files listed in the manifest.
    Manifest,
    /// The manifest was unusable; the single fallback file was read.
    Fallback,
    /// Neither source produced anything.
    Empty,
}

/// Slides gathered by `join_chapters`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JoinOutput {
    /// Entries in manifest order, each chapter file's order kept.
    pub slides: Vec<Value>,
    pub source: JoinSource,
    /// Chapter files that were read.
    pub loaded: Vec<ChapterFile>,
    /// Manifest chapters whose file was missing or not an array.
    pub missing: Vec<String>,
}

/// Statistics for a `join` run that wrote output.
#[derive(Debug, Clone, serde::Serialize)]
pub struct JoinStats {
    pub output_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub slides: usize,
    pub source: JoinSource,
    pub loaded: Vec<ChapterFile>,
    pub missing: Vec<String>,
}

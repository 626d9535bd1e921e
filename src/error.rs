//! Error types for the slides-migrate library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`MigrateError`] (**fatal**): the document cannot be migrated at all
//!   (missing file, invalid JSON, top-level shape is neither an array nor an
//!   object, a write failed). Returned as `Err(MigrateError)` from the
//!   file-level `convert_file` / `split_file` / `join_file` functions.
//!
//! * [`ItemIssue`] (**non-fatal**): a single chapter or item was odd (not a
//!   record, keyed with non-numeric keys) but the rest of the deck is fine.
//!   Collected in [`crate::output::FlattenOutput`] so callers can report
//!   what was skipped instead of losing the whole deck to one bad entry.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the slides-migrate library.
///
/// Item-level problems use [`ItemIssue`] and never abort a run.
#[derive(Debug, Error)]
pub enum MigrateError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid JSON.
    #[error("could not parse JSON in '{path}' (line {line}, column {column}): {detail}")]
    InvalidJson {
        path: PathBuf,
        line: usize,
        column: usize,
        detail: String,
    },

    /// Top-level document is neither an array of slides nor a chapter object.
    #[error("unexpected format in '{path}': expected an array or an object, found {found}")]
    UnexpectedShape { path: PathBuf, found: String },

    /// Splitting needs a flat array; the document is something else.
    #[error("'{path}' is not an array of slides (found {found}); convert it first")]
    NotFlat { path: PathBuf, found: String },

    /// Two chapters would be written to the same file.
    #[error(
        "chapters '{first}' and '{second}' both map to '{path}'; rename one of them"
    )]
    ChapterFileCollision {
        path: PathBuf,
        first: String,
        second: String,
    },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not copy the original file to its backup location.
    #[error("failed to create backup '{backup}' of '{path}': {source}")]
    BackupFailed {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write an output document.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A non-fatal problem with one chapter or item.
///
/// Recorded while flattening; the run continues past every issue.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ItemIssue {
    /// An item is not a record (string, number, list, …) and was skipped.
    #[error("chapter '{chapter}', item {position}: expected an object, found {found}; skipped")]
    InvalidItemShape {
        chapter: String,
        position: usize,
        found: String,
    },

    /// A keyed chapter had non-numeric keys and was ordered lexicographically.
    #[error("chapter '{chapter}': keys {keys:?} are not all numeric; ordered lexicographically")]
    AmbiguousKeyOrdering { chapter: String, keys: Vec<String> },

    /// A chapter value was a scalar and contributed no items.
    #[error("chapter '{chapter}': expected a list or object of slides, found {found}; ignored")]
    InvalidChapterShape { chapter: String, found: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MigrateError>;

/// Human-readable name of a JSON value's kind, for error messages.
pub(crate) fn kind_of(value: &serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
    .to_string()
}

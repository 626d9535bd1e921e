//! Flatten a chapter-keyed deck into one ordered list of slides.
//!
//! Output order is chapter declaration order, then item order within the
//! chapter. Chapters given as objects (`{"2": {...}, "1": {...}}`) are put
//! in order by their keys first.

use crate::error::{kind_of, ItemIssue};
use crate::id_base::{IdBaseSource, TimestampIdBase};
use crate::output::FlattenOutput;
use crate::pipeline::normalize::normalize_item;
use crate::record::SlideRecord;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

/// How the keys of an object-valued chapter were ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrder {
    /// Every key is made of ASCII digits; compared as integers.
    Numeric,
    /// At least one key is not; compared as strings.
    Lexicographic,
}

/// Flatten with a wall-clock id base.
pub fn flatten(chapters: &Map<String, Value>) -> Vec<SlideRecord> {
    flatten_with(chapters, &TimestampIdBase)
}

/// Flatten with an injected id base.
pub fn flatten_with(chapters: &Map<String, Value>, id_base: &dyn IdBaseSource) -> Vec<SlideRecord> {
    flatten_detailed(chapters, id_base).slides
}

/// Flatten and report what was skipped or reordered along the way.
///
/// Never fails: items that are not objects are skipped and recorded as
/// [`ItemIssue::InvalidItemShape`]; they still take up a position, so the
/// generated ids of their neighbours do not shift.
pub fn flatten_detailed(chapters: &Map<String, Value>, id_base: &dyn IdBaseSource) -> FlattenOutput {
    let base = id_base.id_base();
    debug!("Flattening {} chapters with id base '{}'", chapters.len(), base);

    let mut slides = Vec::new();
    let mut issues = Vec::new();
    let mut items_seen = 0;

    for (chapter_idx, (chapter_id, value)) in chapters.iter().enumerate() {
        let items = resolve_items(chapter_id, value, &mut issues);
        items_seen += items.len();

        for (i, item) in items.into_iter().enumerate() {
            let position = position_index(chapter_idx + 1, i + 1);
            match normalize_item(item, chapter_id, &base, &position) {
                Some(record) => slides.push(record),
                None => {
                    let issue = ItemIssue::InvalidItemShape {
                        chapter: chapter_id.clone(),
                        position: i + 1,
                        found: kind_of(item),
                    };
                    warn!("{}", issue);
                    issues.push(issue);
                }
            }
        }
    }

    info!(
        "Flattened {} chapters into {} slides ({} skipped)",
        chapters.len(),
        slides.len(),
        items_seen - slides.len()
    );

    FlattenOutput {
        slides,
        issues,
        chapters: chapters.len(),
        items: items_seen,
        id_base: base,
    }
}

/// `{chapter:02}-{item}`, both 1-based: `01-1`, `02-13`, `120-4`.
pub fn position_index(chapter: usize, item: usize) -> String {
    format!("{chapter:02}-{item}")
}

/// The items of one chapter value, in the order they should be emitted.
fn resolve_items<'a>(chapter_id: &str, value: &'a Value, issues: &mut Vec<ItemIssue>) -> Vec<&'a Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(keyed) => {
            let (keys, order) = sort_item_keys(keyed.keys().map(String::as_str).collect());
            if order == KeyOrder::Lexicographic {
                let issue = ItemIssue::AmbiguousKeyOrdering {
                    chapter: chapter_id.to_string(),
                    keys: keys.iter().map(|k| k.to_string()).collect(),
                };
                info!("{}", issue);
                issues.push(issue);
            }
            keys.into_iter().filter_map(|k| keyed.get(k)).collect()
        }
        Value::Null => Vec::new(),
        other => {
            let issue = ItemIssue::InvalidChapterShape {
                chapter: chapter_id.to_string(),
                found: kind_of(other),
            };
            warn!("{}", issue);
            issues.push(issue);
            Vec::new()
        }
    }
}

/// Sort the keys of an object-valued chapter.
///
/// Numeric when every key is non-empty ASCII digits, lexicographic
/// otherwise. The sort is stable, so keys that compare equal (`"1"` and
/// `"01"`) keep their file order.
pub fn sort_item_keys(mut keys: Vec<&str>) -> (Vec<&str>, KeyOrder) {
    let numeric = keys
        .iter()
        .all(|k| !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()));

    if numeric {
        keys.sort_by(|a, b| cmp_digits(a, b));
        (keys, KeyOrder::Numeric)
    } else {
        keys.sort();
        (keys, KeyOrder::Lexicographic)
    }
}

/// Compare two digit strings by value, without overflow.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

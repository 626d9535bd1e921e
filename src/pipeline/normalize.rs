//! Normalise one raw slide into a record with `id`, `chapter` and `images`.

use crate::record::{SlideRecord, CHAPTER, ID, IMAGES};
use serde_json::Value;

/// Normalise a single raw item.
///
/// Returns `None` when `item` is not a JSON object; the caller skips it.
/// The input is never modified: the returned record is a shallow copy.
///
/// * a blank `chapter` (missing, null, `""`) becomes `chapter_id`
/// * a blank `id` becomes `id_base` followed by `position`
/// * `images` becomes a list: a string or any other non-list value is
///   wrapped, null/missing becomes `[]`
///
/// Every other field is copied verbatim and keeps its place.
pub fn normalize_item(
    item: &Value,
    chapter_id: &str,
    id_base: &str,
    position: &str,
) -> Option<SlideRecord> {
    let mut record = SlideRecord::from_value(item)?;

    if record.is_blank(CHAPTER) {
        record.insert(CHAPTER, Value::String(chapter_id.to_string()));
    }
    if record.is_blank(ID) {
        record.insert(ID, Value::String(format!("{id_base}{position}")));
    }
    if let Some(images) = normalize_images(record.get(IMAGES)) {
        record.insert(IMAGES, images);
    }

    Some(record)
}

/// The replacement `images` value, or `None` when it is already a list.
fn normalize_images(images: Option<&Value>) -> Option<Value> {
    match images {
        Some(Value::Array(_)) => None,
        None | Some(Value::Null) => Some(Value::Array(Vec::new())),
        // A lone path, or any other scalar, becomes a one-element list.
        Some(single) => Some(Value::Array(vec![single.clone()])),
    }
}

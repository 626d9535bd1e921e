//! The slide record: an ordered, open-ended JSON object with typed accessors.
//!
//! Only three fields mean anything to the migration (`id`, `chapter`,
//! `images`); everything else (`title`, `date`, `body`, …) rides along
//! untouched and keeps its position in the object.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the record's unique identifier.
pub const ID: &str = "id";
/// Field naming the chapter the record belongs to.
pub const CHAPTER: &str = "chapter";
/// Field holding the record's image paths.
pub const IMAGES: &str = "images";

/// One slide.
///
/// Serialises as the bare JSON object it wraps. Field order is the order the
/// fields were first inserted, so a record read from disk is written back
/// with its keys in the original order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideRecord(Map<String, Value>);

impl SlideRecord {
    /// Wrap an existing JSON object.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Copy a JSON value into a record if it is an object.
    ///
    /// Returns `None` for every other shape: strings, numbers, lists, null.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(Self)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Look up any field, recognised or not.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a field. Existing fields keep their position; new ones go last.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// The `id` field when it is a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID).and_then(Value::as_str)
    }

    /// The `chapter` field when it is a string.
    pub fn chapter(&self) -> Option<&str> {
        self.0.get(CHAPTER).and_then(Value::as_str)
    }

    /// The chapter this record groups under, as a string.
    ///
    /// Numbers and booleans are rendered the way JSON prints them.
    /// Returns `None` when the field is absent, null or empty.
    pub fn chapter_key(&self) -> Option<String> {
        match self.0.get(CHAPTER) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }

    /// The `images` list, or an empty slice when it is not a list.
    pub fn images(&self) -> &[Value] {
        self.0
            .get(IMAGES)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `key` is missing, null or the empty string.
    pub fn is_blank(&self, key: &str) -> bool {
        is_blank(self.0.get(key))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<SlideRecord> for Value {
    fn from(record: SlideRecord) -> Self {
        record.into_value()
    }
}

impl TryFrom<Value> for SlideRecord {
    type Error = Value;

    /// Take ownership of an object; hand any other shape back unchanged.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

pub(crate) fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

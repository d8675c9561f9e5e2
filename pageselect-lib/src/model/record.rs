//! Dataset record

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Display fields exposed by the artwork collection provider.
///
/// Passed as the `fields` parameter so the provider only returns what the
/// table shows.
pub const ARTWORK_FIELDS: &[&str] = &[
    "id",
    "title",
    "place_of_origin",
    "artist_display",
    "inscriptions",
    "date_start",
    "date_end",
];

/// Unique identifier of a record in the remote dataset.
///
/// Ordering is numeric, so sorted listings are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Returns the raw identifier.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record from the paged dataset.
///
/// Identity is by `id` only; every other key of the provider's JSON object is
/// kept as an opaque display field.
///
/// # Example
///
/// ```
/// use pageselect_lib::model::{Record, RecordId};
///
/// let record = Record::new(RecordId(27992))
///     .set("title", "A Sunday on La Grande Jatte")
///     .set("date_start", 1884);
///
/// assert_eq!(record.get_str("title"), Some("A Sunday on La Grande Jatte"));
/// assert_eq!(record.get_i64("date_start"), Some(1884));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// The unique identifier of the record.
    pub id: RecordId,

    /// The display fields.
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates a record with no display fields.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Sets a display field, returning the record for chaining.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Returns the record identifier.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns a raw display field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns a string field, or `None` if missing, null or not a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Returns an integer field, or `None` if missing, null or not an integer.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }

    /// Renders a field for display. Missing and null fields render as empty.
    pub fn display(&self, name: &str) -> String {
        match self.fields.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Record {}

/// Collects the identifiers of a page's records, in page order.
pub fn record_ids(records: &[Record]) -> Vec<RecordId> {
    records.iter().map(Record::id).collect()
}

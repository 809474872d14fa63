use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Text stored in place of file contents that could not be read.
pub const UNREADABLE_PLACEHOLDER: &str = "could not read file";

/// A single source file as written to the search index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    pub author: String,
    pub filename: String,
    pub text: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    /// Set when `text` is the placeholder rather than the file contents.
    #[serde(default)]
    pub unreadable: bool,
}

/// Accept RFC 3339, or an ISO 8601 timestamp without an offset taken as UTC
/// (Python's `datetime.isoformat()` on a naive datetime).
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
}

/// A matching document returned by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub source: IndexedDocument,
}

/// Result of a match query: the total hit count plus the returned page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub total: u64,
    pub hits: Vec<SearchHit>,
}

/// What the guarded indexing pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    /// The index existed already, nothing was written
    AlreadyPresent,
    Indexed(IndexSummary),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSummary {
    pub documents: usize,
    /// Documents whose text is the unreadable placeholder
    pub unreadable: usize,
}

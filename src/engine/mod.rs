//! Search engine boundary.
//!
//! The pipeline only needs five operations from a search engine: check that
//! an index exists, delete it, upsert a document by id, refresh, and run a
//! match query on the `text` field. [`SearchEngine`] captures exactly that so
//! the embedded tantivy engine and an Elasticsearch node are interchangeable.
//! A document count is exposed as well, for checking what a pass wrote.

pub mod elasticsearch;
pub mod tantivy_index;

use thiserror::Error;

use crate::config::{Backend, Config};
use crate::models::{IndexedDocument, SearchResults};

pub use elasticsearch::ElasticsearchEngine;
pub use tantivy_index::TantivyEngine;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("index '{0}' does not exist")]
    IndexNotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("search engine returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("tantivy error: {0}")]
    Tantivy(#[from] tantivy::TantivyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid document '{id}': {reason}")]
    InvalidDocument { id: String, reason: String },
}

pub trait SearchEngine {
    fn index_exists(&self, index: &str) -> Result<bool, EngineError>;

    /// Remove the index and all its documents. A missing index is
    /// [`EngineError::IndexNotFound`].
    fn delete_index(&self, index: &str) -> Result<(), EngineError>;

    /// Write `doc` under `id`, creating the index on first write and
    /// replacing any document already stored under the same id.
    fn index_document(&self, index: &str, id: u64, doc: &IndexedDocument)
        -> Result<(), EngineError>;

    /// Make every write issued so far visible to `search_text`.
    fn refresh(&self, index: &str) -> Result<(), EngineError>;

    /// Number of searchable documents in the index.
    fn count(&self, index: &str) -> Result<u64, EngineError>;

    /// Full-text match of `term` against the `text` field, best hits first.
    fn search_text(&self, index: &str, term: &str, size: usize)
        -> Result<SearchResults, EngineError>;
}

/// Build the engine selected by `config.engine.backend`.
pub fn open_engine(config: &Config) -> anyhow::Result<Box<dyn SearchEngine>> {
    tracing::info!("Search engine: {}", config.engine.backend);
    let engine: Box<dyn SearchEngine> = match config.engine.backend {
        Backend::Tantivy => Box::new(TantivyEngine::open(&config.index_dir())?),
        Backend::Elasticsearch => {
            Box::new(ElasticsearchEngine::new(&config.engine.elasticsearch_url)?)
        }
    };
    Ok(engine)
}

/// Reject index names that are unusable as a single path segment, using the
/// same rules Elasticsearch applies to index names.
pub fn validate_index_name(index: &str) -> Result<(), EngineError> {
    let invalid = |reason: &str| {
        Err(EngineError::BadRequest(format!(
            "invalid index name '{index}': {reason}"
        )))
    };

    if index.is_empty() {
        return invalid("must not be empty");
    }
    if index == "." || index == ".." {
        return invalid("must not be '.' or '..'");
    }
    if index.starts_with(['-', '_', '+']) {
        return invalid("must not start with '-', '_' or '+'");
    }
    if index.chars().any(|c| c.is_uppercase()) {
        return invalid("must be lowercase");
    }
    if let Some(c) = index.chars().find(|&c| {
        matches!(
            c,
            '\\' | '/' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' | ',' | '#' | ':'
        )
    }) {
        return invalid(&format!("must not contain '{c}'"));
    }
    Ok(())
}

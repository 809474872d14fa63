//! Turns selected file paths into `IndexedDocument`s.

use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::models::{IndexedDocument, UNREADABLE_PLACEHOLDER};

/// Read one file into a document.
///
/// Any read failure (missing file, permissions, invalid UTF-8) is masked:
/// the text becomes the placeholder and `unreadable` is set.
/// `filename` is the lossy UTF-8 rendering of `path`.
pub fn read_document(path: &Path, author: &str) -> IndexedDocument {
    let (text, unreadable) = match std::fs::read_to_string(path) {
        Ok(content) => (content, false),
        Err(e) => {
            tracing::debug!("Could not read {}: {e}", path.display());
            (UNREADABLE_PLACEHOLDER.to_string(), true)
        }
    };

    IndexedDocument {
        author: author.to_string(),
        // Lossy: non-UTF-8 path bytes become U+FFFD in the stored filename
        filename: path.to_string_lossy().to_string(),
        text,
        timestamp: Utc::now(),
        unreadable,
    }
}

/// One document per path, in input order.
pub fn build_documents(paths: &[PathBuf], author: &str) -> Vec<IndexedDocument> {
    paths.iter().map(|p| read_document(p, author)).collect()
}

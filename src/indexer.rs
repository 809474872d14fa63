//! Index Writer: the guarded, all-or-nothing indexing pass.

use anyhow::{Context, Result};
use std::path::Path;

use crate::documents::build_documents;
use crate::engine::SearchEngine;
use crate::git::select_files;
use crate::models::{IndexOutcome, IndexSummary, IndexedDocument};

/// Write `docs` to `index` one at a time, using each document's position as its id.
///
/// The first failed write aborts the pass; documents already written stay in the index.
pub fn index_documents(
    engine: &dyn SearchEngine,
    index: &str,
    docs: &[IndexedDocument],
) -> Result<()> {
    for (i, doc) in docs.iter().enumerate() {
        engine
            .index_document(index, i as u64, doc)
            .with_context(|| format!("Failed to index {} as document {i}", doc.filename))?;
    }
    Ok(())
}

/// Index every allow-listed file under `root`, unless `index` already exists.
///
/// Presence of the index is the only check, so changes to the files under
/// `root` are not picked up while the index is kept around.
pub fn index_repo(
    engine: &dyn SearchEngine,
    index: &str,
    root: &Path,
    extensions: &[String],
    author: &str,
) -> Result<IndexOutcome> {
    if engine
        .index_exists(index)
        .with_context(|| format!("Failed to check whether index {index} exists"))?
    {
        tracing::info!("Index {index} already exists, skipping indexing");
        return Ok(IndexOutcome::AlreadyPresent);
    }

    tracing::info!("Index {index} does not exist, indexing {}", root.display());
    let files = select_files(root, extensions)?;

    tracing::info!("Adding {} files to index {index}", files.len());
    let docs = build_documents(&files, author);
    index_documents(engine, index, &docs)?;

    let summary = IndexSummary {
        documents: docs.len(),
        unreadable: docs.iter().filter(|d| d.unreadable).count(),
    };

    // Nothing written means the index was never created
    if summary.documents > 0 {
        engine
            .refresh(index)
            .with_context(|| format!("Failed to refresh index {index}"))?;
    }

    tracing::info!(
        "Indexing done: {} documents ({} unreadable)",
        summary.documents,
        summary.unreadable
    );
    Ok(IndexOutcome::Indexed(summary))
}

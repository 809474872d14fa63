//! Search Client: one match query, rendered as plain text.

use anyhow::{Context, Result};
use std::io::Write;

use crate::engine::SearchEngine;
use crate::models::SearchResults;

/// Run a match query for `term` against the `text` field of `index`.
pub fn search(
    engine: &dyn SearchEngine,
    index: &str,
    term: &str,
    size: usize,
) -> Result<SearchResults> {
    tracing::info!("Searching for \"{term}\" in {index}");
    engine
        .search_text(index, term, size)
        .with_context(|| format!("Search for \"{term}\" in {index} failed"))
}

/// Write the hit count, then `timestamp author filename` for each hit.
pub fn render_results(results: &SearchResults, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "Got {} Hits:", results.total)?;
    for hit in &results.hits {
        let doc = &hit.source;
        writeln!(
            out,
            "{} {} {}",
            doc.timestamp.to_rfc3339(),
            doc.author,
            doc.filename
        )?;
    }
    Ok(())
}

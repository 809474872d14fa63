//! The fixed run: mirror, index if absent, search, delete.

use anyhow::{Context, Result};
use std::io::Write;

use crate::config::Config;
use crate::engine::SearchEngine;
use crate::git::{mirror_repo, MirrorOutcome};
use crate::indexer::index_repo;
use crate::lifecycle::delete_index;
use crate::models::{IndexOutcome, SearchResults};
use crate::search::{render_results, search};

/// What one run did, stage by stage
#[derive(Debug, Clone)]
pub struct RunReport {
    pub mirror: MirrorOutcome,
    pub indexing: IndexOutcome,
    pub results: SearchResults,
    pub index_deleted: bool,
}

/// Execute the whole run against `engine`, writing search results to `out`.
///
/// A failure at any stage ends the run immediately, before the index is deleted.
pub fn run(config: &Config, engine: &dyn SearchEngine, out: &mut dyn Write) -> Result<RunReport> {
    let clone_dir = config.clone_dir();
    let mirror = mirror_repo(&config.repo_url, &clone_dir)?;

    let indexing = index_repo(
        engine,
        &config.index_name,
        &clone_dir,
        &config.extensions,
        &config.author,
    )?;

    let results = search(engine, &config.index_name, &config.query, config.search_size)?;
    render_results(&results, out).context("Failed to write search results")?;

    let index_deleted = !config.keep_index;
    if index_deleted {
        delete_index(engine, &config.index_name)?;
    } else {
        tracing::info!("Keeping index {}", config.index_name);
    }

    Ok(RunReport {
        mirror,
        indexing,
        results,
        index_deleted,
    })
}

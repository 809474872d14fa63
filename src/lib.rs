//! # repo-index
//!
//! Mirror a git repository, load its source files into a full-text index,
//! and run a match query against it.
//!
//! ## Architecture
//!
//! ```text
//!   repo_url ──► git::mirror_repo ──► clone_dir
//!                                        │
//!                                        ▼
//!                             git::select_files (allow-listed extensions)
//!                                        │
//!                                        ▼
//!                          documents::build_documents
//!                                        │
//!                                        ▼
//!        indexer::index_repo (skipped when the index already exists)
//!                  │  one write per document, id = position
//!                  ▼
//!           engine::SearchEngine ──► refresh
//!                  │
//!                  ▼
//!           search::search ──► search::render_results
//!                  │
//!                  ▼
//!           lifecycle::delete_index
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration (repo, paths, index name, query, engine)
//! - [`models`] - `IndexedDocument`, search results and indexing outcomes
//! - [`git`] - Repository mirroring via libgit2 and allow-list file selection
//! - [`documents`] - Reading selected files into documents, masking unreadable ones
//! - [`engine`] - The `SearchEngine` boundary with tantivy and Elasticsearch backends
//! - [`indexer`] - The guarded indexing pass
//! - [`search`] - Match query and result rendering
//! - [`lifecycle`] - Index deletion tolerant of absent indices
//! - [`pipeline`] - The end-to-end run

pub mod config;
pub mod documents;
pub mod engine;
pub mod git;
pub mod indexer;
pub mod lifecycle;
pub mod models;
pub mod pipeline;
pub mod search;

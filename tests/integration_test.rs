//! Integration tests for the repo-index pipeline.
//!
//! These tests run the full mirror, index, search and delete flow against
//! the embedded tantivy engine, using a local git repository as the remote.

use std::path::Path;

use repo_index::config::Config;
use repo_index::engine::{SearchEngine, TantivyEngine};
use repo_index::git::MirrorOutcome;
use repo_index::indexer::index_repo;
use repo_index::lifecycle::delete_index;
use repo_index::models::{IndexOutcome, IndexSummary};
use repo_index::pipeline;

const INDEX: &str = "git-index";

fn extensions() -> Vec<String> {
    Config::default().extensions
}

/// Helper: the three-file tree used throughout.
fn write_sample_tree(root: &Path) {
    std::fs::create_dir_all(root).unwrap();
    std::fs::write(root.join("a.go"), "package main\nfunc main(){}").unwrap();
    std::fs::write(root.join("b.css"), "body{}").unwrap();
    std::fs::write(root.join("c.txt"), "ignored").unwrap();
}

/// Helper: create a git repository at `dir` with one commit containing `files`.
fn init_source_repo(dir: &Path, files: &[(&str, &str)]) {
    let repo = git2::Repository::init(dir).unwrap();
    for (name, content) in files {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = git2::Signature::now("test", "test@example.com").unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "initial commit", &tree, &[])
        .unwrap();
}

fn test_config(data_dir: &Path, repo_url: &str) -> Config {
    Config {
        repo_url: repo_url.to_string(),
        data_dir: data_dir.to_path_buf(),
        ..Config::default()
    }
}

#[test]
fn test_sample_tree_indexes_only_allow_listed_files() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("repo");
    write_sample_tree(&root);
    let engine = TantivyEngine::open(&dir.path().join("index")).unwrap();

    let outcome = index_repo(&engine, INDEX, &root, &extensions(), "shaysw").unwrap();
    assert_eq!(
        outcome,
        IndexOutcome::Indexed(IndexSummary {
            documents: 2,
            unreadable: 0
        })
    );
    assert_eq!(engine.count(INDEX).unwrap(), 2);

    let results = engine.search_text(INDEX, "package main", 10).unwrap();
    assert!(results.total >= 1);
    assert!(results
        .hits
        .iter()
        .any(|h| h.source.filename.ends_with("a.go")));
    assert!(results.hits.iter().all(|h| h.source.author == "shaysw"));

    // "ignored" only appears in c.txt, which is not allow-listed
    let results = engine.search_text(INDEX, "ignored", 10).unwrap();
    assert_eq!(results.total, 0);
    assert!(results.hits.is_empty());
}

#[test]
fn test_second_pass_performs_no_writes() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("repo");
    write_sample_tree(&root);
    let engine = TantivyEngine::open(&dir.path().join("index")).unwrap();

    index_repo(&engine, INDEX, &root, &extensions(), "shaysw").unwrap();
    assert_eq!(engine.count(INDEX).unwrap(), 2);

    // A changed repository is not picked up while the index exists
    std::fs::write(root.join("d.js"), "console.log('new')").unwrap();
    let outcome = index_repo(&engine, INDEX, &root, &extensions(), "shaysw").unwrap();
    assert_eq!(outcome, IndexOutcome::AlreadyPresent);
    assert_eq!(engine.count(INDEX).unwrap(), 2);
}

#[test]
fn test_unreadable_file_is_indexed_with_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("repo");
    write_sample_tree(&root);
    std::fs::write(root.join("blob.xml"), [0xff, 0xfe, 0xfd]).unwrap();
    let engine = TantivyEngine::open(&dir.path().join("index")).unwrap();

    let outcome = index_repo(&engine, INDEX, &root, &extensions(), "shaysw").unwrap();
    assert_eq!(
        outcome,
        IndexOutcome::Indexed(IndexSummary {
            documents: 3,
            unreadable: 1
        })
    );

    let results = engine.search_text(INDEX, "could not read file", 10).unwrap();
    let degraded = results
        .hits
        .iter()
        .find(|h| h.source.filename.ends_with("blob.xml"))
        .expect("placeholder document is searchable");
    assert_eq!(degraded.source.text, "could not read file");
    assert!(degraded.source.unreadable);
}

#[test]
fn test_delete_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("repo");
    write_sample_tree(&root);
    let engine = TantivyEngine::open(&dir.path().join("index")).unwrap();

    // Deleting something that was never created is fine
    delete_index(&engine, INDEX).unwrap();

    index_repo(&engine, INDEX, &root, &extensions(), "shaysw").unwrap();
    assert!(engine.index_exists(INDEX).unwrap());

    delete_index(&engine, INDEX).unwrap();
    assert!(!engine.index_exists(INDEX).unwrap());

    // And a second delete is still fine
    delete_index(&engine, INDEX).unwrap();

    // The next pass indexes again
    let outcome = index_repo(&engine, INDEX, &root, &extensions(), "shaysw").unwrap();
    assert!(matches!(outcome, IndexOutcome::Indexed(_)));
}

#[test]
fn test_pipeline_with_existing_mirror() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path(), "https://invalid.example/unused.git");
    config.clone_dir = Some(dir.path().join("mirror"));
    write_sample_tree(&dir.path().join("mirror"));
    let engine = TantivyEngine::open(&config.index_dir()).unwrap();

    let mut out = Vec::new();
    let report = pipeline::run(&config, &engine, &mut out).unwrap();

    assert_eq!(report.mirror, MirrorOutcome::AlreadyPresent);
    assert!(matches!(report.indexing, IndexOutcome::Indexed(s) if s.documents == 2));
    assert_eq!(report.results.total, 1);
    assert!(report.index_deleted);
    assert!(!engine.index_exists(INDEX).unwrap());

    let printed = String::from_utf8(out).unwrap();
    let mut lines = printed.lines();
    assert_eq!(lines.next(), Some("Got 1 Hits:"));
    let hit_line = lines.next().unwrap();
    assert!(hit_line.contains(" shaysw "));
    assert!(hit_line.ends_with("a.go"));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_pipeline_clones_local_repository() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("upstream");
    init_source_repo(
        &source,
        &[
            ("cmd/main.go", "package main\n\nfunc main() {}\n"),
            ("web/index.html", "<html><body>hello</body></html>"),
            ("web/site.css", "body { margin: 0 }"),
            ("README.md", "package main is mentioned here too"),
        ],
    );

    let data_dir = dir.path().join("data");
    let mut config = test_config(&data_dir, source.to_str().unwrap());
    config.keep_index = true;
    let engine = TantivyEngine::open(&config.index_dir()).unwrap();

    let mut out = Vec::new();
    let report = pipeline::run(&config, &engine, &mut out).unwrap();

    assert_eq!(report.mirror, MirrorOutcome::Cloned);
    assert_eq!(config.clone_dir(), data_dir.join("repos").join("upstream"));
    assert!(config.clone_dir().join("cmd/main.go").is_file());
    assert!(matches!(report.indexing, IndexOutcome::Indexed(s) if s.documents == 3));
    assert_eq!(report.results.total, 1);
    assert!(report.results.hits[0].source.filename.ends_with("main.go"));

    // keep_index leaves the index for the next run, which then skips both mirror and indexing
    assert!(!report.index_deleted);
    assert!(engine.index_exists(INDEX).unwrap());

    let mut out = Vec::new();
    let second = pipeline::run(&config, &engine, &mut out).unwrap();
    assert_eq!(second.mirror, MirrorOutcome::AlreadyPresent);
    assert_eq!(second.indexing, IndexOutcome::AlreadyPresent);
    assert_eq!(second.results.total, 1);
    assert_eq!(engine.count(INDEX).unwrap(), 3);
}

#[test]
fn test_pipeline_stops_on_clone_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), dir.path().join("missing").to_str().unwrap());
    let engine = TantivyEngine::open(&config.index_dir()).unwrap();

    let mut out = Vec::new();
    assert!(pipeline::run(&config, &engine, &mut out).is_err());
    assert!(out.is_empty());
    assert!(!engine.index_exists(INDEX).unwrap());
}

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Extensions eligible for indexing, with the leading dot.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".html", ".go", ".xml", ".css"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote repository to mirror
    pub repo_url: String,
    /// Where the index data (and, by default, the clone) is stored
    pub data_dir: PathBuf,
    /// Local working copy destination. Defaults to `<data_dir>/repos/<repo name>`
    pub clone_dir: Option<PathBuf>,
    /// Name of the search index
    pub index_name: String,
    /// Allow-listed file extensions, matched case-sensitively including the dot
    pub extensions: Vec<String>,
    /// Author recorded on every indexed document
    pub author: String,
    /// Term searched for after indexing
    pub query: String,
    /// Maximum number of hits returned by the search
    pub search_size: usize,
    /// Skip the final index deletion
    pub keep_index: bool,
    /// Search engine backend configuration
    pub engine: EngineConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Tantivy,
    Elasticsearch,
}

impl Backend {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "tantivy" => Some(Backend::Tantivy),
            "elasticsearch" | "elastic" | "es" => Some(Backend::Elasticsearch),
            _ => None,
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Tantivy => f.write_str("tantivy"),
            Backend::Elasticsearch => f.write_str("elasticsearch"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub backend: Backend,
    /// Base URL of the Elasticsearch node (elasticsearch backend only)
    pub elasticsearch_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Tantivy,
            elasticsearch_url: "http://localhost:9200".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_url: "https://github.com/shaysw/GameOfLife.git".to_string(),
            data_dir: PathBuf::from("./data"),
            clone_dir: None,
            index_name: "git-index".to_string(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            author: "shaysw".to_string(),
            query: "package main".to_string(),
            search_size: 10,
            keep_index: false,
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("REPO_INDEX_REPO_URL") {
            config.repo_url = url;
        }
        if let Ok(dir) = std::env::var("REPO_INDEX_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("REPO_INDEX_CLONE_DIR") {
            config.clone_dir = Some(PathBuf::from(dir));
        }
        if let Ok(name) = std::env::var("REPO_INDEX_NAME") {
            config.index_name = name;
        }
        if let Ok(list) = std::env::var("REPO_INDEX_EXTENSIONS") {
            config.extensions = parse_extensions(&list);
        }
        if let Ok(author) = std::env::var("REPO_INDEX_AUTHOR") {
            config.author = author;
        }
        if let Ok(query) = std::env::var("REPO_INDEX_QUERY") {
            config.query = query;
        }
        if let Ok(val) = std::env::var("REPO_INDEX_SEARCH_SIZE") {
            if let Ok(v) = val.parse() {
                config.search_size = v;
            }
        }
        if let Ok(val) = std::env::var("REPO_INDEX_KEEP_INDEX") {
            config.keep_index = matches!(val.trim(), "1" | "true" | "yes");
        }

        // Engine config
        if let Ok(val) = std::env::var("REPO_INDEX_ENGINE") {
            if let Some(backend) = Backend::parse(&val) {
                config.engine.backend = backend;
            }
        }
        if let Ok(url) = std::env::var("ELASTICSEARCH_URL") {
            config.engine.elasticsearch_url = url;
        }

        config
    }

    /// Directory the repository is mirrored into.
    pub fn clone_dir(&self) -> PathBuf {
        match &self.clone_dir {
            Some(dir) => dir.clone(),
            None => self.data_dir.join("repos").join(repo_name(&self.repo_url)),
        }
    }

    /// Root directory of the embedded tantivy engine.
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }
}

/// Derive a directory name from a repository URL.
pub fn repo_name(url: &str) -> String {
    let name = url
        .trim_end_matches('/')
        .rsplit(['/', '\\', ':'])
        .next()
        .unwrap_or_default()
        .trim_end_matches(".git");
    if name.is_empty() {
        "repo".to_string()
    } else {
        name.to_string()
    }
}

/// Split a comma-separated extension list, adding the leading dot where missing.
pub fn parse_extensions(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|e| {
            if e.starts_with('.') {
                e.to_string()
            } else {
                format!(".{e}")
            }
        })
        .collect()
}

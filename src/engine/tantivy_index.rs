use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tantivy::collector::{Count, TopDocs};
use tantivy::query::BooleanQuery;
use tantivy::schema::*;
use tantivy::tokenizer::TokenStream;
use tantivy::{doc, Index, IndexWriter, ReloadPolicy, Term};

use super::{validate_index_name, EngineError, SearchEngine};
use crate::models::{IndexedDocument, SearchHit, SearchResults};

const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Embedded search engine: every named index is a tantivy index stored in
/// `<root>/<name>`.
///
/// Writes are buffered in a per-index `IndexWriter` and only become visible
/// to searches after [`SearchEngine::refresh`] commits them.
pub struct TantivyEngine {
    root: PathBuf,
    schema: Schema,
    // Field handles
    f_id: Field,
    f_text: Field,
    f_source: Field,
    writers: Mutex<HashMap<String, IndexWriter>>,
}

impl TantivyEngine {
    /// Open the engine rooted at `root`, creating the directory if needed.
    pub fn open(root: &Path) -> Result<Self, EngineError> {
        std::fs::create_dir_all(root)?;

        let mut schema_builder = Schema::builder();
        let f_id = schema_builder.add_text_field("_id", STRING | STORED);
        let f_text = schema_builder.add_text_field("text", TEXT);
        let f_source = schema_builder.add_text_field("_source", STORED);
        let schema = schema_builder.build();

        Ok(Self {
            root: root.to_path_buf(),
            schema,
            f_id,
            f_text,
            f_source,
            writers: Mutex::new(HashMap::new()),
        })
    }

    fn index_path(&self, index: &str) -> PathBuf {
        self.root.join(index)
    }

    fn open_index(&self, index: &str) -> Result<Index, EngineError> {
        if !self.index_exists(index)? {
            return Err(EngineError::IndexNotFound(index.to_string()));
        }
        Ok(Index::open_in_dir(self.index_path(index))?)
    }

    fn open_or_create_writer(&self, index: &str) -> Result<IndexWriter, EngineError> {
        let dir = self.index_path(index);
        let tantivy_index = if dir.join("meta.json").exists() {
            Index::open_in_dir(&dir)?
        } else {
            std::fs::create_dir_all(&dir)?;
            tracing::debug!("Creating index {index} at {}", dir.display());
            Index::create_in_dir(&dir, self.schema.clone())?
        };
        Ok(tantivy_index.writer(WRITER_HEAP_BYTES)?)
    }

    /// Analyze `term` with the `text` field's tokenizer and OR the tokens
    /// together, the same way an Elasticsearch `match` query does.
    fn match_query(&self, index: &Index, term: &str) -> Result<Option<BooleanQuery>, EngineError> {
        let mut analyzer = index.tokenizer_for_field(self.f_text)?;
        let mut stream = analyzer.token_stream(term);
        let mut terms = Vec::new();
        while stream.advance() {
            terms.push(Term::from_field_text(self.f_text, &stream.token().text));
        }
        if terms.is_empty() {
            return Ok(None);
        }
        Ok(Some(BooleanQuery::new_multiterms_query(terms)))
    }
}

impl SearchEngine for TantivyEngine {
    fn index_exists(&self, index: &str) -> Result<bool, EngineError> {
        validate_index_name(index)?;
        Ok(self.index_path(index).join("meta.json").exists())
    }

    fn delete_index(&self, index: &str) -> Result<(), EngineError> {
        let was_present = self.index_exists(index)?;

        // Dropping the writer releases the directory lock and discards unrefreshed writes.
        drop(self.writers.lock().remove(index));

        let dir = self.index_path(index);
        if dir.exists() {
            std::fs::remove_dir_all(&dir)?;
        }
        if !was_present {
            return Err(EngineError::IndexNotFound(index.to_string()));
        }
        tracing::debug!("Deleted index {index}");
        Ok(())
    }

    fn index_document(
        &self,
        index: &str,
        id: u64,
        doc: &IndexedDocument,
    ) -> Result<(), EngineError> {
        validate_index_name(index)?;
        let source = serde_json::to_string(doc)?;

        let mut writers = self.writers.lock();
        let writer = match writers.entry(index.to_string()) {
            std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::hash_map::Entry::Vacant(e) => {
                e.insert(self.open_or_create_writer(index)?)
            }
        };

        let id = id.to_string();
        writer.delete_term(Term::from_field_text(self.f_id, &id));
        writer.add_document(doc!(
            self.f_id => id,
            self.f_text => doc.text.clone(),
            self.f_source => source,
        ))?;
        Ok(())
    }

    fn refresh(&self, index: &str) -> Result<(), EngineError> {
        if !self.index_exists(index)? {
            return Err(EngineError::IndexNotFound(index.to_string()));
        }
        if let Some(writer) = self.writers.lock().get_mut(index) {
            writer.commit()?;
        }
        Ok(())
    }

    fn count(&self, index: &str) -> Result<u64, EngineError> {
        let reader = self
            .open_index(index)?
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(reader.searcher().num_docs())
    }

    fn search_text(
        &self,
        index: &str,
        term: &str,
        size: usize,
    ) -> Result<SearchResults, EngineError> {
        let tantivy_index = self.open_index(index)?;
        let Some(query) = self.match_query(&tantivy_index, term)? else {
            return Ok(SearchResults::default());
        };

        let reader = tantivy_index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        let searcher = reader.searcher();

        // TopDocs rejects a zero limit
        if size == 0 {
            let total = searcher.search(&query, &Count)?;
            return Ok(SearchResults {
                total: total as u64,
                hits: Vec::new(),
            });
        }

        let (total, top_docs) = searcher.search(&query, &(Count, TopDocs::with_limit(size)))?;

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher.doc(doc_address)?;

            let id = doc
                .get_first(self.f_id)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();

            let source = doc
                .get_first(self.f_source)
                .and_then(|v| v.as_str())
                .ok_or_else(|| EngineError::InvalidDocument {
                    id: id.clone(),
                    reason: "missing _source".to_string(),
                })?;

            hits.push(SearchHit {
                source: serde_json::from_str(source)?,
                id,
                score,
            });
        }

        Ok(SearchResults {
            total: total as u64,
            hits,
        })
    }
}

impl Drop for TantivyEngine {
    // Persist buffered writes, matching an engine that stores writes before they are refreshed.
    fn drop(&mut self) {
        for (index, writer) in self.writers.get_mut().iter_mut() {
            if let Err(e) = writer.commit() {
                tracing::warn!("Failed to commit pending writes for {index}: {e}");
            }
        }
    }
}

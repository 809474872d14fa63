use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use super::{EngineError, SearchEngine};
use crate::models::{IndexedDocument, SearchHit, SearchResults};

/// Search engine backed by an Elasticsearch node over its REST API.
pub struct ElasticsearchEngine {
    client: Client,
    base_url: String,
}

impl ElasticsearchEngine {
    pub fn new(base_url: &str) -> Result<Self, EngineError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Map a non-success HTTP status onto the engine error taxonomy.
fn status_error(index: &str, status: StatusCode, body: String) -> EngineError {
    match status {
        StatusCode::NOT_FOUND => EngineError::IndexNotFound(index.to_string()),
        StatusCode::BAD_REQUEST => EngineError::BadRequest(body),
        other => EngineError::Status {
            status: other.as_u16(),
            body,
        },
    }
}

fn check(index: &str, resp: Response) -> Result<Response, EngineError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(status_error(index, status, body))
}

// ─── Response shapes ─────────────────────────────────────

#[derive(Deserialize)]
struct CountResponse {
    count: u64,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct HitsEnvelope {
    total: TotalHits,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// 7.x+ reports `{"value": n, "relation": ..}`, 6.x a bare number.
#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Object { value: u64 },
    Count(u64),
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f32>,
    #[serde(rename = "_source")]
    source: IndexedDocument,
}

fn parse_search_response(body: &str) -> Result<SearchResults, EngineError> {
    let resp: SearchResponse = serde_json::from_str(body)?;
    let total = match resp.hits.total {
        TotalHits::Object { value } => value,
        TotalHits::Count(n) => n,
    };
    let hits = resp
        .hits
        .hits
        .into_iter()
        .map(|h| SearchHit {
            id: h.id,
            score: h.score.unwrap_or(0.0),
            source: h.source,
        })
        .collect();
    Ok(SearchResults { total, hits })
}

impl SearchEngine for ElasticsearchEngine {
    fn index_exists(&self, index: &str) -> Result<bool, EngineError> {
        let resp = self.client.head(self.url(index)).send()?;
        match resp.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            other => Err(status_error(index, other, String::new())),
        }
    }

    fn delete_index(&self, index: &str) -> Result<(), EngineError> {
        let resp = self.client.delete(self.url(index)).send()?;
        check(index, resp)?;
        Ok(())
    }

    fn index_document(
        &self,
        index: &str,
        id: u64,
        doc: &IndexedDocument,
    ) -> Result<(), EngineError> {
        let resp = self
            .client
            .put(self.url(&format!("{index}/_doc/{id}")))
            .json(doc)
            .send()?;
        check(index, resp)?;
        Ok(())
    }

    fn refresh(&self, index: &str) -> Result<(), EngineError> {
        let resp = self
            .client
            .post(self.url(&format!("{index}/_refresh")))
            .send()?;
        check(index, resp)?;
        Ok(())
    }

    fn count(&self, index: &str) -> Result<u64, EngineError> {
        let resp = self
            .client
            .get(self.url(&format!("{index}/_count")))
            .send()?;
        let text = check(index, resp)?.text()?;
        let body: CountResponse = serde_json::from_str(&text)?;
        Ok(body.count)
    }

    fn search_text(
        &self,
        index: &str,
        term: &str,
        size: usize,
    ) -> Result<SearchResults, EngineError> {
        let body = json!({
            "query": { "match": { "text": term } },
            "size": size,
        });
        let resp = self
            .client
            .post(self.url(&format!("{index}/_search")))
            .json(&body)
            .send()?;
        let text = check(index, resp)?.text()?;
        parse_search_response(&text)
    }
}

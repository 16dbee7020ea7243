/// Retrieval Backend
///
/// The search service the tools delegate to. `RetrievalBackend` is the seam
/// the handlers call through; `HttpBackend` is the production implementation.
/// Request bodies are typed; results are passed along as raw JSON objects.

mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::error::BackendError;

/// Operations offered by the retrieval service.
///
/// Each call is a single remote request with no retry.
#[async_trait]
pub trait RetrievalBackend: Send + Sync {
    /// Non-generative search returning matching document chunks.
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError>;

    /// Search plus a generated answer over the matching documents.
    async fn ai_search(&self, request: &AiSearchRequest) -> Result<AiSearchResponse, BackendError>;
}

/// Body of a `search` call.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub rewrite_query: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_num_results: Option<u32>,
    pub ranking_options: RankingOptions,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RankingOptions {
    pub score_threshold: f64,
}

/// Body of an `ai_search` call.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AiSearchRequest {
    #[serde(flatten)]
    pub search: SearchRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// Result of a `search` call, as the service returned it.
///
/// Kept as an open JSON object so fields the service adds or leaves null
/// reach the client unchanged.
pub type SearchResponse = Map<String, Value>;

/// Result of an `ai_search` call, as the service returned it.
pub type AiSearchResponse = Map<String, Value>;

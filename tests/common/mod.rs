//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use retrieval_mcp_server::backend::{
    AiSearchRequest, AiSearchResponse, RetrievalBackend, SearchRequest, SearchResponse,
};
use retrieval_mcp_server::core::config::ServerInfo;
use retrieval_mcp_server::core::dispatcher::Dispatcher;
use retrieval_mcp_server::core::error::BackendError;
use retrieval_mcp_server::tools;

/// Backend answering from fixed JSON and remembering what it was asked.
#[derive(Default)]
pub struct StubBackend {
    pub unavailable: bool,
    pub searches: Mutex<Vec<SearchRequest>>,
    pub ai_searches: Mutex<Vec<AiSearchRequest>>,
}

#[async_trait]
impl RetrievalBackend for StubBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError> {
        self.searches.lock().unwrap().push(request.clone());
        if self.unavailable {
            return Err(BackendError::Status {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(serde_json::from_value(json!({
            "object": "vector_store.search_results.page",
            "search_query": request.query,
            "data": [
                { "file_id": "a", "content": "first", "score": 0.9, "metadata": { "lang": "en" } },
                { "file_id": "b", "content": "second", "score": 0.6 }
            ]
        }))?)
    }

    async fn ai_search(&self, request: &AiSearchRequest) -> Result<AiSearchResponse, BackendError> {
        self.ai_searches.lock().unwrap().push(request.clone());
        if self.unavailable {
            return Err(BackendError::Rejected("generation failed".to_string()));
        }
        Ok(serde_json::from_value(json!({
            "object": "vector_store.search_results.page",
            "search_query": request.search.query,
            "response": "generated answer",
            "data": [{
                "file_id": "a",
                "filename": "guide.md",
                "score": 0.9,
                "attributes": { "folder": "docs/" },
                "content": [{ "id": "c1", "type": "text", "text": "first" }]
            }],
            "has_more": true,
            "next_page": "next-token"
        }))?)
    }
}

pub fn dispatcher_with(backend: Arc<StubBackend>) -> Dispatcher {
    let registry = tools::build_registry(backend);
    Dispatcher::new(
        ServerInfo {
            name: "retrieval-test".to_string(),
            version: "0.0.0".to_string(),
        },
        Arc::new(registry),
    )
}

/// Rewrite Search Tool
///
/// Lets the backend rewrite the query before searching (on unless the caller
/// turns it off). Uses the non-generative search call, so the result holds
/// document chunks only and never a generated answer.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::backend::{RankingOptions, RetrievalBackend, SearchRequest};
use crate::core::error::ToolError;
use crate::core::registry::{ToolOutput, ToolRegistry};
use crate::core::schema::Schema;
use crate::tools::{
    DEFAULT_SCORE_THRESHOLD, backend_failure, bind, max_num_results_field, parse_arguments,
    query_field, render, rewrite_query_field, score_threshold_field,
};

pub const NAME: &str = "rewrite_search";

#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RewriteSearchArgs {
    pub query: String,
    #[serde(default)]
    pub score_threshold: Option<f64>,
    #[serde(default, deserialize_with = "crate::tools::result_count")]
    pub max_num_results: Option<u32>,
    #[serde(default)]
    pub rewrite_query: Option<bool>,
}

impl RewriteSearchArgs {
    pub fn into_request(self) -> SearchRequest {
        SearchRequest {
            query: self.query,
            rewrite_query: self.rewrite_query.unwrap_or(true),
            max_num_results: self.max_num_results,
            ranking_options: RankingOptions {
                score_threshold: self.score_threshold.unwrap_or(DEFAULT_SCORE_THRESHOLD),
            },
        }
    }
}

pub fn parameters() -> Schema {
    Schema::object([
        query_field(),
        score_threshold_field(),
        max_num_results_field(),
        rewrite_query_field(),
    ])
}

/// Register the rewrite search tool with the tool registry.
pub fn register(registry: &mut ToolRegistry, backend: Arc<dyn RetrievalBackend>) {
    registry.register(
        NAME,
        "Search the knowledge base with query rewriting enabled by default. Returns matching document chunks without a generated answer.",
        parameters(),
        bind(backend, run),
    );
}

pub async fn run(
    backend: Arc<dyn RetrievalBackend>,
    arguments: Value,
) -> Result<ToolOutput, ToolError> {
    let args: RewriteSearchArgs = parse_arguments(NAME, arguments)?;
    match backend.search(&args.into_request()).await {
        Ok(response) => render(&response),
        Err(err) => Ok(backend_failure(NAME, err)),
    }
}

/// AI Search Tool
///
/// Uses the generative search call with query rewriting on by default. The
/// generated answer is dropped from the output unless the caller opts in with
/// `include_ai_response`. A `cursor` is forwarded untouched, and when the
/// backend reports a further page its token is returned as `next_cursor`.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::backend::{
    AiSearchRequest, AiSearchResponse, RankingOptions, RetrievalBackend, SearchRequest,
};
use crate::core::error::ToolError;
use crate::core::registry::{ToolOutput, ToolRegistry};
use crate::core::schema::Schema;
use crate::tools::{
    DEFAULT_SCORE_THRESHOLD, backend_failure, bind, max_num_results_field, parse_arguments,
    query_field, render, rewrite_query_field, score_threshold_field,
};

pub const NAME: &str = "ai_search";

#[derive(Deserialize, Debug, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AiSearchArgs {
    pub query: String,
    #[serde(default)]
    pub score_threshold: Option<f64>,
    #[serde(default, deserialize_with = "crate::tools::result_count")]
    pub max_num_results: Option<u32>,
    #[serde(default)]
    pub rewrite_query: Option<bool>,
    #[serde(default)]
    pub include_ai_response: Option<bool>,
    #[serde(default)]
    pub cursor: Option<String>,
}

impl AiSearchArgs {
    fn into_request(self) -> (AiSearchRequest, bool) {
        let include_answer = self.include_ai_response.unwrap_or(false);
        let request = AiSearchRequest {
            search: SearchRequest {
                query: self.query,
                rewrite_query: self.rewrite_query.unwrap_or(true),
                max_num_results: self.max_num_results,
                ranking_options: RankingOptions {
                    score_threshold: self.score_threshold.unwrap_or(DEFAULT_SCORE_THRESHOLD),
                },
            },
            cursor: self.cursor,
        };
        (request, include_answer)
    }
}

/// The backend result with the answer gated and the continuation token
/// under a stable name. Every other field is passed through untouched, in
/// the order the backend sent it.
fn shape_output(response: AiSearchResponse, include_answer: bool) -> AiSearchResponse {
    response
        .into_iter()
        .filter_map(|(key, value)| match key.as_str() {
            "response" if !include_answer => None,
            "next_page" if value.is_null() => None,
            "next_page" => Some(("next_cursor".to_string(), value)),
            _ => Some((key, value)),
        })
        .collect()
}

pub fn parameters() -> Schema {
    Schema::object([
        query_field(),
        score_threshold_field(),
        max_num_results_field(),
        rewrite_query_field(),
        (
            "include_ai_response",
            Schema::boolean()
                .optional()
                .describe("Include the generated answer text in the result (default false)"),
        ),
        (
            "cursor",
            Schema::string()
                .optional()
                .describe("Continuation token from a previous result's next_cursor"),
        ),
    ])
}

/// Register the AI search tool with the tool registry.
pub fn register(registry: &mut ToolRegistry, backend: Arc<dyn RetrievalBackend>) {
    registry.register(
        NAME,
        "Search the knowledge base with query rewriting and AI-generated answers. The answer text is only included when include_ai_response is true; pass next_cursor back as cursor to fetch more results.",
        parameters(),
        bind(backend, run),
    );
}

pub async fn run(
    backend: Arc<dyn RetrievalBackend>,
    arguments: Value,
) -> Result<ToolOutput, ToolError> {
    let args: AiSearchArgs = parse_arguments(NAME, arguments)?;
    let (request, include_answer) = args.into_request();
    match backend.ai_search(&request).await {
        Ok(response) => render(&shape_output(response, include_answer)),
        Err(err) => Ok(backend_failure(NAME, err)),
    }
}

/// Tools Module
///
/// The retrieval tools exposed over MCP. Each tool module exports a
/// `register` function that adds the tool to the registry; `build_registry`
/// is the fixed table of tools the server offers.
///
/// Argument handling shared by the tools lives here: typed parsing of call
/// arguments, the default score threshold, and how backend failures turn into
/// text payloads.

pub mod ai_search;
pub mod rewrite_search;
pub mod search;

use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::backend::RetrievalBackend;
use crate::core::error::{BackendError, ToolError};
use crate::core::registry::{ToolHandler, ToolOutput, ToolRegistry};
use crate::core::schema::Schema;

/// Score floor sent to the backend when the caller gives none.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.5;

/// Build the registry holding every tool, bound to `backend`.
pub fn build_registry(backend: Arc<dyn RetrievalBackend>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    // Registration order is listing order
    search::register(&mut registry, backend.clone());
    rewrite_search::register(&mut registry, backend.clone());
    ai_search::register(&mut registry, backend);

    tracing::debug!(tools = registry.len(), "tool registry built");
    registry
}

/// Wrap an async tool body into a registry handler bound to `backend`.
fn bind<F, Fut>(backend: Arc<dyn RetrievalBackend>, run: F) -> ToolHandler
where
    F: Fn(Arc<dyn RetrievalBackend>, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolOutput, ToolError>> + Send + 'static,
{
    Box::new(move |arguments| run(backend.clone(), arguments).boxed())
}

/// Deserialize call arguments into a tool's typed input.
fn parse_arguments<T: DeserializeOwned>(tool: &str, arguments: Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

/// Reads an optional result count sent as a JSON number.
///
/// `5` and `5.0` are both accepted; fractional or negative values are not.
fn result_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(value) = Option::<f64>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) {
        Ok(Some(value as u32))
    } else {
        Err(D::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )))
    }
}

/// Pretty-printed JSON text of a tool result.
fn render<T: Serialize>(value: &T) -> Result<ToolOutput, ToolError> {
    serde_json::to_string_pretty(value)
        .map(ToolOutput::Ok)
        .map_err(|e| ToolError::Internal(format!("failed to serialize tool result: {e}")))
}

/// Backend problems are reported to the client as text, not protocol errors.
fn backend_failure(tool: &str, err: BackendError) -> ToolOutput {
    tracing::warn!(tool, error = %err, "retrieval backend call failed");
    ToolOutput::Failure(format!("Error: {err}"))
}

fn query_field() -> (&'static str, Schema) {
    ("query", Schema::string().describe("The search query"))
}

fn score_threshold_field() -> (&'static str, Schema) {
    (
        "score_threshold",
        Schema::number()
            .optional()
            .describe("Minimum similarity score for returned results (default 0.5)"),
    )
}

fn max_num_results_field() -> (&'static str, Schema) {
    (
        "max_num_results",
        Schema::number()
            .optional()
            .describe("Maximum number of results to return (whole number)"),
    )
}

fn rewrite_query_field() -> (&'static str, Schema) {
    (
        "rewrite_query",
        Schema::boolean()
            .optional()
            .describe("Rewrite the query for better retrieval (default true)"),
    )
}

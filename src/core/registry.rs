/// Tool Registry
///
/// Ordered map from tool name to its description, compiled input schema and
/// handler. The registry is filled once from the static tool table and is
/// read-only afterwards.

use futures_util::future::BoxFuture;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::core::error::ToolError;
use crate::core::schema::{self, JsonSchema, Schema};

/// Text a tool hands back to the client.
///
/// Both variants serialize to the same content payload. `Failure` carries a
/// human-readable description of a backend problem; clients read tool output
/// as text, so such problems are reported there rather than as JSON-RPC
/// errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Ok(String),
    Failure(String),
}

impl ToolOutput {
    pub fn text(&self) -> &str {
        match self {
            Self::Ok(text) | Self::Failure(text) => text,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// The MCP `tools/call` result for this output.
    pub fn into_content(self) -> ContentPayload {
        let text = match self {
            Self::Ok(text) | Self::Failure(text) => text,
        };
        ContentPayload {
            content: vec![ContentItem::Text { text }],
        }
    }
}

/// `tools/call` result body.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ContentPayload {
    pub content: Vec<ContentItem>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text { text: String },
}

/// Tool handler function type definition.
///
/// Handlers are boxed closures that take the call's JSON arguments and
/// resolve to the tool's output. `Err` is reserved for invalid arguments and
/// faults the handler cannot describe as output.
pub type ToolHandler =
    Box<dyn Fn(Value) -> BoxFuture<'static, Result<ToolOutput, ToolError>> + Send + Sync>;

/// One registered tool.
pub struct RegisteredTool {
    pub name: String,
    pub description: String,
    pub parameters: Schema,
    pub input_schema: JsonSchema,
    pub handler: ToolHandler,
}

impl RegisteredTool {
    pub async fn call(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        (self.handler)(arguments).await
    }

    /// The wire shape used by `tools/list`.
    pub fn info(&self) -> ToolInfo<'_> {
        ToolInfo {
            name: &self.name,
            description: &self.description,
            input_schema: &self.input_schema,
        }
    }
}

/// MCP tool definition as listed to clients.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ToolInfo<'a> {
    pub name: &'a str,
    pub description: &'a str,
    #[serde(rename = "inputSchema")]
    pub input_schema: &'a JsonSchema,
}

/// Registry of available MCP tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, compiling its parameter schema.
    ///
    /// Re-registering a name replaces the earlier tool but keeps its position
    /// in the listing.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Schema,
        handler: ToolHandler,
    ) {
        let name = name.into();
        let input_schema = schema::compile(&parameters);
        let tool = RegisteredTool {
            name: name.clone(),
            description: description.into(),
            parameters,
            input_schema,
            handler,
        };
        if let Some(previous) = self.tools.insert(name, tool) {
            tracing::debug!(tool = %previous.name, "replaced previously registered tool");
        }
    }

    /// All tools in registration order.
    pub fn list(&self) -> Vec<ToolInfo<'_>> {
        self.tools.values().map(RegisteredTool::info).collect()
    }

    pub fn lookup(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use serde_json::json;

    fn fixed(text: &'static str) -> ToolHandler {
        Box::new(move |_args| async move { Ok(ToolOutput::Ok(text.to_string())) }.boxed())
    }

    fn query_schema() -> Schema {
        Schema::object([("query", Schema::string())])
    }

    #[test]
    fn lists_in_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register("b", "second", query_schema(), fixed("b"));
        registry.register("a", "first", query_schema(), fixed("a"));
        registry.register("c", "third", Schema::record(), fixed("c"));

        let names: Vec<_> = registry.list().iter().map(|t| t.name).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn last_registration_wins_in_place() {
        let mut registry = ToolRegistry::new();
        registry.register("x", "old", query_schema(), fixed("old"));
        registry.register("y", "other", query_schema(), fixed("y"));
        registry.register("x", "new", Schema::record(), fixed("new"));

        assert_eq!(registry.len(), 2);
        let listed = registry.list();
        assert_eq!(listed[0].name, "x");
        assert_eq!(listed[0].description, "new");

        let output = registry.lookup("x").unwrap().call(json!({})).await.unwrap();
        assert_eq!(output.text(), "new");
    }

    #[test]
    fn lookup_misses_unknown_names() {
        let registry = ToolRegistry::new();
        assert!(registry.lookup("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn tool_info_uses_camel_case_schema_key() {
        let mut registry = ToolRegistry::new();
        registry.register("x", "desc", query_schema(), fixed("x"));
        let value = serde_json::to_value(registry.list()).unwrap();
        assert_eq!(
            value,
            json!([{
                "name": "x",
                "description": "desc",
                "inputSchema": {
                    "type": "object",
                    "properties": { "query": { "type": "string" } },
                    "required": ["query"]
                }
            }])
        );
    }

    #[test]
    fn ok_and_failure_serialize_identically() {
        let ok = serde_json::to_value(ToolOutput::Ok("same".into()).into_content()).unwrap();
        let failure =
            serde_json::to_value(ToolOutput::Failure("same".into()).into_content()).unwrap();
        assert_eq!(ok, failure);
        assert_eq!(ok, json!({ "content": [{ "type": "text", "text": "same" }] }));
    }
}

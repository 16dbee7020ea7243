/// MCP Request Dispatcher
///
/// Routes one decoded JSON-RPC request to its MCP method handler and wraps
/// the outcome in a response that echoes the request id. The dispatcher holds
/// only the server identity and a read-only tool registry, so one instance is
/// shared by every transport and every request.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use serde_json::{Value, json};

use crate::core::config::ServerInfo;
use crate::core::error::RpcError;
use crate::core::protocol::{JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
use crate::core::registry::ToolRegistry;

pub struct Dispatcher {
    server: ServerInfo,
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(server: ServerInfo, registry: Arc<ToolRegistry>) -> Self {
        Self { server, registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn server_info(&self) -> &ServerInfo {
        &self.server
    }

    /// Handle one request. Always produces a response.
    ///
    /// A panic while routing (for example inside a tool handler) is caught
    /// and reported as `-32603`.
    pub async fn handle(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        let method = request.method.clone().unwrap_or_default();

        let outcome = AssertUnwindSafe(self.route(request)).catch_unwind().await;
        match outcome {
            Ok(Ok(result)) => JsonRpcResponse::success(id, result),
            Ok(Err(error)) => {
                tracing::debug!(%method, code = error.code, message = %error.message, "request failed");
                JsonRpcResponse::failure(id, error)
            }
            Err(panic) => {
                let message = panic_message(&*panic);
                tracing::error!(%method, %message, "request handler panicked");
                JsonRpcResponse::failure(id, RpcError::internal(message))
            }
        }
    }

    async fn route(&self, request: JsonRpcRequest) -> Result<Value, RpcError> {
        let Some(method) = request.method.as_deref() else {
            return Err(RpcError::method_required());
        };
        tracing::debug!(method, "dispatching request");

        match method {
            "initialize" => Ok(self.initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.registry.list() })),
            "tools/call" => self.call_tool(request.params).await,
            // No resources or prompts are offered; listed for MCP compliance
            "resources/list" => Ok(json!({ "resources": [] })),
            "prompts/list" => Ok(json!({ "prompts": [] })),
            other => Err(RpcError::method_not_found(other)),
        }
    }

    fn initialize(&self) -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
                "resources": {},
                "prompts": {}
            },
            "serverInfo": {
                "name": self.server.name,
                "version": self.server.version
            }
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, RpcError> {
        let Some(Value::Object(mut params)) = params else {
            return Err(RpcError::invalid_params("tools/call params must be an object"));
        };
        let name = match params.remove("name") {
            Some(Value::String(name)) => name,
            _ => {
                return Err(RpcError::invalid_params(
                    "tools/call requires string field 'name'",
                ));
            }
        };
        let arguments = match params.remove("arguments") {
            None | Some(Value::Null) => json!({}),
            Some(arguments) => arguments,
        };

        let tool = self
            .registry
            .lookup(&name)
            .ok_or_else(|| RpcError::tool_not_found(&name))?;

        let output = tool.call(arguments).await?;
        if output.is_failure() {
            tracing::warn!(tool = %name, "tool reported a failure payload");
        } else {
            tracing::info!(tool = %name, "tool call completed");
        }

        serde_json::to_value(output.into_content()).map_err(|e| RpcError::internal(e.to_string()))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// JSON-RPC 2.0 Wire Types
///
/// Request and response structures for the MCP protocol, plus `decode`, which
/// turns raw transport bytes into a request or a ready-to-send error response.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::core::error::RpcError;

/// The MCP protocol version advertised in `initialize`.
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request structure for MCP protocol.
///
/// `id` distinguishes an omitted id (`None`) from an explicit `null`
/// (`Some(Value::Null)`) so the response can echo it exactly.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    /// JSON-RPC version identifier, must be "2.0"
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Request ID for correlating responses
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
    /// MCP method name (e.g., "initialize", "tools/list", "tools/call")
    #[serde(default)]
    pub method: Option<String>,
    /// Method-specific parameters as JSON value
    #[serde(default)]
    pub params: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcRequest {
    /// Build a request in code; used by tests and the stdio loop.
    pub fn new(id: Option<Value>, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: Some("2.0".to_string()),
            id,
            method: Some(method.into()),
            params,
        }
    }

    /// Notifications carry no id and expect no response body.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
            && self
                .method
                .as_deref()
                .is_some_and(|m| m.starts_with("notifications/"))
    }
}

/// JSON-RPC 2.0 response structure for MCP protocol.
///
/// Exactly one of `result` and `error` is set; the constructors enforce it.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct JsonRpcResponse {
    /// JSON-RPC version identifier, always "2.0"
    pub jsonrpc: &'static str,
    /// Request ID from the original request, omitted when the request had none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Response result, present when request succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error information, present when request failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<Value>, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Decode one JSON-RPC request from raw bytes.
///
/// Returns the error response to send when the bytes are not JSON (`-32700`)
/// or not a single JSON-RPC 2.0 request object (`-32600`). A missing method
/// is not a shape error here; the dispatcher answers it with `-32601`.
pub fn decode(body: &[u8]) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        JsonRpcResponse::failure(None, RpcError::parse_error(format!("Parse error: {e}")))
    })?;

    let Some(object) = value.as_object() else {
        let message = if value.is_array() {
            "Batch requests are not supported"
        } else {
            "Request must be a JSON object"
        };
        return Err(JsonRpcResponse::failure(None, RpcError::invalid_request(message)));
    };

    let id = object.get("id").cloned();
    if object.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return Err(JsonRpcResponse::failure(
            id,
            RpcError::invalid_request("jsonrpc must be \"2.0\""),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| JsonRpcResponse::failure(id, RpcError::invalid_request(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{INVALID_REQUEST, PARSE_ERROR};
    use serde_json::json;

    #[test]
    fn omitted_and_null_ids_are_distinct() {
        let omitted = decode(br#"{"jsonrpc":"2.0","method":"tools/list"}"#).unwrap();
        let null = decode(br#"{"jsonrpc":"2.0","id":null,"method":"tools/list"}"#).unwrap();
        assert_eq!(omitted.id, None);
        assert_eq!(null.id, Some(Value::Null));
    }

    #[test]
    fn string_and_number_ids_survive() {
        let req = decode(br#"{"jsonrpc":"2.0","id":"abc","method":"ping"}"#).unwrap();
        assert_eq!(req.id, Some(json!("abc")));
        let req = decode(br#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#).unwrap();
        assert_eq!(req.id, Some(json!(7)));
    }

    #[test]
    fn missing_method_still_decodes() {
        let req = decode(br#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert_eq!(req.method, None);
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let resp = decode(b"not json").unwrap_err();
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);
        assert_eq!(resp.id, None);
    }

    #[test]
    fn wrong_version_is_invalid_request_and_keeps_id() {
        let resp = decode(br#"{"jsonrpc":"1.0","id":3,"method":"ping"}"#).unwrap_err();
        assert_eq!(resp.id, Some(json!(3)));
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn batches_and_scalars_are_invalid_requests() {
        let resp = decode(b"[]").unwrap_err();
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
        let resp = decode(b"42").unwrap_err();
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn non_string_method_is_invalid_request() {
        let resp = decode(br#"{"jsonrpc":"2.0","id":1,"method":5}"#).unwrap_err();
        assert_eq!(resp.id, Some(json!(1)));
        assert_eq!(resp.error.unwrap().code, INVALID_REQUEST);
    }

    #[test]
    fn response_omits_id_only_when_request_had_none() {
        let omitted = serde_json::to_value(JsonRpcResponse::success(None, json!({}))).unwrap();
        assert!(omitted.get("id").is_none());

        let null =
            serde_json::to_value(JsonRpcResponse::success(Some(Value::Null), json!({}))).unwrap();
        assert_eq!(null.get("id"), Some(&Value::Null));
    }

    #[test]
    fn response_carries_exactly_one_of_result_or_error() {
        let ok = serde_json::to_value(JsonRpcResponse::success(Some(json!(1)), json!({}))).unwrap();
        assert!(ok.get("result").is_some() && ok.get("error").is_none());

        let err = serde_json::to_value(JsonRpcResponse::failure(
            Some(json!(1)),
            RpcError::method_not_found("x"),
        ))
        .unwrap();
        assert!(err.get("error").is_some() && err.get("result").is_none());
    }

    #[test]
    fn notifications_need_no_id_and_notification_method() {
        let n = JsonRpcRequest::new(None, "notifications/initialized", None);
        assert!(n.is_notification());
        let r = JsonRpcRequest::new(Some(json!(1)), "notifications/initialized", None);
        assert!(!r.is_notification());
        let m = JsonRpcRequest::new(None, "tools/list", None);
        assert!(!m.is_notification());
    }
}

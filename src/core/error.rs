/// Error Types
///
/// Configuration, backend and tool errors are `thiserror` enums. `RpcError`
/// is the JSON-RPC error vocabulary every dispatch failure ends up in.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Invalid JSON was received.
pub const PARSE_ERROR: i32 = -32700;
/// The JSON sent is not a valid request object.
pub const INVALID_REQUEST: i32 = -32600;
/// The method or tool does not exist.
pub const METHOD_NOT_FOUND: i32 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i32 = -32602;
/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i32 = -32603;

/// Errors raised while reading server configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable: {name}")]
    Missing {
        /// Variable name.
        name: &'static str,
    },

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Failures talking to the retrieval backend.
///
/// Handlers never propagate these; they become the text of a failure payload.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The request could not be sent or the body could not be read.
    #[error("request to retrieval backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success HTTP status.
    #[error("retrieval backend returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Messages reported by the backend, or the raw body.
        message: String,
    },

    /// The backend answered 2xx but flagged the call as failed.
    #[error("retrieval backend reported an error: {0}")]
    Rejected(String),

    /// The response body did not have the expected shape.
    #[error("unexpected retrieval backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failures of a tool invocation that are reported at the protocol level.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The arguments do not match the tool's input schema.
    #[error("Invalid arguments for tool {tool}: {source}")]
    InvalidArguments {
        /// Tool name.
        tool: String,
        /// Deserialization failure describing the mismatch.
        #[source]
        source: serde_json::Error,
    },

    /// The handler failed for a reason it could not turn into a payload.
    #[error("{0}")]
    Internal(String),
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    /// JSON-RPC error code
    pub code: i32,
    /// Human-readable error message
    pub message: String,
    /// Optional additional error data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(PARSE_ERROR, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(INVALID_REQUEST, message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {method}"))
    }

    pub fn method_required() -> Self {
        Self::new(METHOD_NOT_FOUND, "Method is required")
    }

    pub fn tool_not_found(name: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Tool not found: {name}"))
            .with_data(serde_json::json!({ "name": name }))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, format!("Internal error: {}", message.into()))
    }
}

impl From<ToolError> for RpcError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::InvalidArguments { .. } => Self::invalid_params(err.to_string()),
            ToolError::Internal(message) => Self::internal(message),
        }
    }
}

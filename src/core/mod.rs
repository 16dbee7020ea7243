/// Core Server Framework Module
///
/// This module contains the protocol-level server implementation:
/// - protocol.rs: JSON-RPC 2.0 wire types and request decoding
/// - schema.rs: tool parameter descriptors and their JSON Schema compiler
/// - registry.rs: ordered tool registry and handler types
/// - dispatcher.rs: MCP method routing and error mapping
/// - server.rs: HTTP and STDIO transports
/// - config.rs: environment configuration
/// - error.rs: error types and JSON-RPC error codes

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod schema;
pub mod server;

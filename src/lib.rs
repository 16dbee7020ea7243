/// Retrieval MCP Server
///
/// Exposes retrieval-service search operations as Model Context Protocol
/// tools over JSON-RPC 2.0.
///
/// - `core`: protocol types, schema compiler, tool registry, dispatcher and
///   transports
/// - `tools`: the search tools and the static tool table
/// - `backend`: the retrieval service client

pub mod backend;
pub mod core;
pub mod tools;

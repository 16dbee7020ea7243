/// Retrieval MCP Server Entry Point
///
/// Reads configuration from environment variables (see `core::config`),
/// connects the tool registry to the retrieval service, and starts the
/// transports selected by MCP_TRANSPORT_MODE ("stdio", "http", or "both").
///
/// Logging goes to stderr and is filtered with RUST_LOG (default: info).

use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use retrieval_mcp_server::backend::HttpBackend;
use retrieval_mcp_server::core::config::{ServerConfig, TransportMode};
use retrieval_mcp_server::core::dispatcher::Dispatcher;
use retrieval_mcp_server::core::server;
use retrieval_mcp_server::tools;

/// Initialises the tracing subscriber for logging.
///
/// stdout is reserved for the STDIO protocol stream.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let backend = match HttpBackend::new(&config.backend) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!(error = %e, "failed to create retrieval backend client");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(url = %config.backend.base_url, "retrieval backend configured");

    let registry = Arc::new(tools::build_registry(Arc::new(backend)));
    let dispatcher = Arc::new(Dispatcher::new(config.server.clone(), registry));

    let result = match config.transport {
        // STDIO only: used for MCP Inspector and local clients
        TransportMode::Stdio => server::run_server_stdio(dispatcher).await,
        TransportMode::Http => server::run_server_http(dispatcher, config.http).await,
        TransportMode::Both => {
            // STDIO runs in the background; the HTTP server owns the process lifetime
            let stdio_dispatcher = dispatcher.clone();
            let stdio_handle = tokio::spawn(async move {
                if let Err(e) = server::run_server_stdio(stdio_dispatcher).await {
                    tracing::error!(error = %e, "STDIO server error");
                }
            });

            let http_result = server::run_server_http(dispatcher, config.http).await;
            stdio_handle.abort();
            http_result
        }
    };

    match result {
        Ok(()) => {
            tracing::info!("server shut down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "server error");
            ExitCode::FAILURE
        }
    }
}

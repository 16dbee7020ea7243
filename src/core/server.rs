/// MCP Server Transports
///
/// This module exposes the dispatcher over two transports:
/// - HTTP with Actix Web: one JSON-RPC request per POST body
/// - STDIO: newline-delimited JSON-RPC on stdin/stdout
///
/// Both decode with `protocol::decode`, so malformed input gets the same
/// JSON-RPC error on either transport.

use actix_web::{
    App, HttpResponse, HttpServer,
    middleware::{Compress, DefaultHeaders, Logger},
    web,
};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::HttpConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::protocol::{self, JsonRpcResponse};

/// Health check endpoint handler.
///
/// Returns a simple JSON response indicating the server is running.
/// Used by load balancers and monitoring systems to verify server availability.
async fn health(dispatcher: web::Data<Dispatcher>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": dispatcher.server_info().name
    }))
}

/// MCP JSON-RPC request handler.
///
/// Every request body gets a `200` JSON-RPC response, errors included.
/// Notifications are acknowledged with `202` and no body.
async fn mcp_handler(dispatcher: web::Data<Dispatcher>, body: Bytes) -> HttpResponse {
    let request = match protocol::decode(&body) {
        Ok(request) => request,
        Err(response) => return HttpResponse::Ok().json(response),
    };

    if request.is_notification() {
        tracing::debug!(method = ?request.method, "notification received");
        return HttpResponse::Accepted().finish();
    }

    HttpResponse::Ok().json(dispatcher.handle(request).await)
}

/// Register the MCP routes on an Actix app.
///
/// Shared by `run_server_http` and the endpoint tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/mcp", web::post().to(mcp_handler))
        .route("/", web::post().to(mcp_handler))
        .route("/", web::get().to(health));
}

/// Run the MCP server in HTTP mode.
///
/// # Configuration
/// The server is configured with:
/// - Worker threads: from `HttpConfig` (CPU count, max 16, by default)
/// - Max connections: 10,000 concurrent connections
/// - Connection rate limit: 1,000 connections per second
/// - Keep-alive: 30 seconds
/// - Request timeout: 30 seconds
/// - Disconnect timeout: 2 seconds
/// - Shutdown timeout: 10 seconds
pub async fn run_server_http(dispatcher: Arc<Dispatcher>, config: HttpConfig) -> std::io::Result<()> {
    let bind_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        name = %dispatcher.server_info().name,
        version = %dispatcher.server_info().version,
        bind = %bind_addr,
        workers = config.workers,
        tools = dispatcher.registry().len(),
        "MCP server starting (HTTP mode)"
    );

    let dispatcher = web::Data::from(dispatcher);

    HttpServer::new(move || {
        App::new()
            .app_data(dispatcher.clone())
            // Enable compression for JSON responses (gzip/brotli)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "DENY")),
            )
            // %r = request line, %s = status, %Dms = duration in milliseconds
            .wrap(Logger::new("%r %s %Dms"))
            .configure(configure)
    })
    .workers(config.workers)
    .max_connections(10000)
    .max_connection_rate(1000)
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_secs(30))
    .client_disconnect_timeout(Duration::from_secs(2))
    .shutdown_timeout(10)
    .bind(&bind_addr)?
    .run()
    .await
}

/// Process one stdio line. `None` means nothing is written back.
pub async fn handle_line(dispatcher: &Dispatcher, line: &str) -> Option<JsonRpcResponse> {
    if line.trim().is_empty() {
        return None;
    }

    let request = match protocol::decode(line.as_bytes()) {
        Ok(request) => request,
        Err(response) => {
            tracing::warn!(error = ?response.error, "rejected malformed stdio message");
            return Some(response);
        }
    };

    if request.is_notification() {
        tracing::debug!(method = ?request.method, "notification received");
        return None;
    }

    Some(dispatcher.handle(request).await)
}

/// Run the MCP server in STDIO mode.
///
/// Reads JSON-RPC requests line-by-line from stdin and writes one response
/// line per request to stdout. Logging goes to stderr so it never mixes with
/// the protocol stream. Requests are processed one at a time.
pub async fn run_server_stdio(dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

    tracing::info!(
        name = %dispatcher.server_info().name,
        version = %dispatcher.server_info().version,
        tools = dispatcher.registry().len(),
        "MCP server starting (STDIO mode)"
    );

    let mut stdin = BufReader::with_capacity(8192, tokio::io::stdin()).lines();
    let mut stdout = BufWriter::with_capacity(8192, tokio::io::stdout());

    while let Some(line) = stdin.next_line().await? {
        let Some(response) = handle_line(&dispatcher, &line).await else {
            continue;
        };

        let response_json = match serde_json::to_string(&response) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response");
                continue;
            }
        };

        // Each response must be on a single line followed by newline
        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, STDIO server exiting");
    Ok(())
}

/// Configuration from Environment Variables
///
/// All settings are read once at startup. Every variable except
/// `RETRIEVAL_API_URL` has a default:
///
/// - SERVER_NAME: Name of the server (default: crate name)
/// - SERVER_VERSION: Version string (default: crate version)
/// - MCP_TRANSPORT_MODE: "stdio", "http", or "both" (default: "both")
/// - HOST: Bind address for HTTP mode (default: "0.0.0.0")
/// - PORT: Port number for HTTP mode (default: 3000)
/// - WORKER_THREADS: HTTP worker count (default: CPU count, max 16)
/// - RETRIEVAL_API_URL: Base URL of the retrieval service (required)
/// - RETRIEVAL_API_TOKEN: Bearer token for the retrieval service
/// - RETRIEVAL_TIMEOUT_SECS: Per-request timeout for backend calls

use std::str::FromStr;

use reqwest::Url;

use crate::core::error::ConfigError;

/// Which transports to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Http,
    Both,
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            "both" => Ok(Self::Both),
            _ => Err("must be 'stdio', 'http', or 'both'".to_string()),
        }
    }
}

/// Server identity reported by `initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

/// Retrieval service connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: Url,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Complete server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub server: ServerInfo,
    pub transport: TransportMode,
    pub http: HttpConfig,
    pub backend: BackendConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its
    /// value when set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerInfo::default();
        let server = ServerInfo {
            name: lookup("SERVER_NAME").unwrap_or(defaults.name),
            version: lookup("SERVER_VERSION").unwrap_or(defaults.version),
        };

        let transport = match lookup("MCP_TRANSPORT_MODE") {
            Some(raw) => parse("MCP_TRANSPORT_MODE", raw)?,
            None => TransportMode::Both,
        };

        let workers = match lookup("WORKER_THREADS") {
            Some(raw) => parse::<usize>("WORKER_THREADS", raw)?.max(1),
            // Capped at 16 to avoid excessive context switching
            None => num_cpus::get().clamp(1, 16),
        };
        let http = HttpConfig {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: match lookup("PORT") {
                Some(raw) => parse("PORT", raw)?,
                None => 3000,
            },
            workers,
        };

        let raw_url = lookup("RETRIEVAL_API_URL").ok_or(ConfigError::Missing {
            name: "RETRIEVAL_API_URL",
        })?;
        let backend = BackendConfig {
            base_url: parse("RETRIEVAL_API_URL", raw_url)?,
            api_token: lookup("RETRIEVAL_API_TOKEN").filter(|t| !t.is_empty()),
            timeout_secs: lookup("RETRIEVAL_TIMEOUT_SECS")
                .map(|raw| parse("RETRIEVAL_TIMEOUT_SECS", raw))
                .transpose()?,
        };

        Ok(Self {
            server,
            transport,
            http,
            backend,
        })
    }
}

fn parse<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.parse::<T>() {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError::Invalid {
            name,
            value,
            reason: e.to_string(),
        }),
    }
}

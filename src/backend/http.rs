/// HTTP client for the retrieval service.
///
/// Calls `POST {base}/search` and `POST {base}/ai-search`. The service wraps
/// every answer in `{success, errors, result}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::backend::{
    AiSearchRequest, AiSearchResponse, RetrievalBackend, SearchRequest, SearchResponse,
};
use crate::core::config::BackendConfig;
use crate::core::error::BackendError;

#[derive(Deserialize, Debug)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

fn default_success() -> bool {
    true
}

#[derive(Deserialize, Debug)]
struct ApiMessage {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

fn join_messages(messages: &[ApiMessage]) -> String {
    messages
        .iter()
        .map(|m| match m.code {
            Some(code) => format!("{} (code {code})", m.message),
            None => m.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Retrieval backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        })
    }

    fn endpoint(&self, operation: &str) -> String {
        format!(
            "{}/{operation}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }

    async fn post<B, T>(&self, operation: &str, body: &B) -> Result<T, BackendError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(operation);
        let mut request = self.http.post(&url).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!(%url, "calling retrieval backend");
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<Envelope<serde_json::Value>>(&bytes) {
                Ok(envelope) if !envelope.errors.is_empty() => join_messages(&envelope.errors),
                _ => String::from_utf8_lossy(&bytes).into_owned(),
            };
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)?;
        if !envelope.success {
            return Err(BackendError::Rejected(join_messages(&envelope.errors)));
        }
        envelope
            .result
            .ok_or_else(|| BackendError::Rejected("response carried no result".to_string()))
    }
}

#[async_trait]
impl RetrievalBackend for HttpBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, BackendError> {
        self.post("search", request).await
    }

    async fn ai_search(&self, request: &AiSearchRequest) -> Result<AiSearchResponse, BackendError> {
        self.post("ai-search", request).await
    }
}

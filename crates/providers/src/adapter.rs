use reqwest::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use thiserror::Error;

use crate::types::{ChatRequest, RawResponse};
use chatpane_core::EndpointConfig;

/// Failure to complete an exchange with the endpoint
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// Connection refused, DNS failure, reset, unreadable body...
    #[error("transport error: {0}")]
    Transport(String),

    /// The client's transport timeout fired
    #[error("request timed out")]
    Timeout,

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

impl From<BackendError> for chatpane_core::Error {
    fn from(err: BackendError) -> Self {
        chatpane_core::Error::Backend(err.to_string())
    }
}

/// Transport for one chat exchange
///
/// Implementations post the request and hand back whatever status and body came back. Deciding
/// what that status and body mean is left to [`crate::ReplyOutcome::classify`].
#[async_trait::async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<RawResponse, BackendError>;

    /// Where requests go, for log events
    fn endpoint(&self) -> &str;
}

/// Backend that POSTs JSON to an HTTP endpoint
pub struct HttpBackend {
    client: HttpClient,
    url: String,
}

impl HttpBackend {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| BackendError::Build(e.to_string()))?;

        Ok(Self { client, url: url.into() })
    }

    pub fn from_config(config: &EndpointConfig) -> Result<Self, BackendError> {
        Self::new(config.url(), config.timeout_secs.map(Duration::from_secs))
    }
}

#[async_trait::async_trait]
impl ChatBackend for HttpBackend {
    async fn send(&self, request: &ChatRequest) -> Result<RawResponse, BackendError> {
        tracing::debug!(url = %self.url, "posting chat message");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::Timeout
                } else {
                    BackendError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| BackendError::Transport(e.to_string()))?;

        tracing::debug!(status, body_len = body.len(), "chat endpoint replied");
        Ok(RawResponse { status, body })
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

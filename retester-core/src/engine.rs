//! Matching-engine port and its HTTP client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use retester_common::MatchResponse;

const DEFAULT_API_URL: &str = "https://api.retester.dev";

/// Base URL for the matching engine. Override with `RETESTER_API_URL` for
/// dev/testing.
pub fn api_url() -> String {
    std::env::var("RETESTER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("network error: {0}")]
    Network(String),
    #[error("engine returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed engine response: {0}")]
    Decode(String),
}

/// One submission to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRequest {
    pub pattern: String,
    pub text: String,
    /// `None` when the user is only matching, not replacing.
    pub replace: Option<String>,
    /// Option bitmask from the catalog codec.
    pub options: u32,
}

/// Engine self-description, shown as the warm-up banner.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineInfo {
    pub framework: String,
}

/// Port to the remote matching engine. The session issues exactly one call
/// per submission and never cancels an in-flight one.
#[async_trait(?Send)]
pub trait MatchEngine {
    async fn submit(&self, request: MatchRequest) -> Result<MatchResponse, EngineError>;
    /// Describe the remote engine. Also serves to wake a cold server.
    async fn info(&self) -> Result<EngineInfo, EngineError>;
}

/// reqwest-backed engine client.
#[derive(Clone)]
pub struct HttpMatchEngine {
    base_url: String,
    client: reqwest::Client,
}

impl HttpMatchEngine {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpMatchEngine {
    fn default() -> Self {
        Self::new(api_url())
    }
}

#[async_trait(?Send)]
impl MatchEngine for HttpMatchEngine {
    async fn submit(&self, request: MatchRequest) -> Result<MatchResponse, EngineError> {
        let url = format!("{}/regex", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(EngineError::Api { status, body });
        }

        resp.json()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()))
    }

    async fn info(&self) -> Result<EngineInfo, EngineError> {
        let url = format!("{}/info", self.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(EngineError::Api {
                status: resp.status().as_u16(),
                body: String::new(),
            });
        }

        resp.json()
            .await
            .map_err(|e| EngineError::Decode(e.to_string()))
    }
}

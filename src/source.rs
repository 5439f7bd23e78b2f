//! Status fetch seam: the `StatusSource` trait and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::status::{StatusFetchError, StatusPayload};

/// Where the poller gets per-investment status from. Behind this seam in
/// tests sits a scripted source; in the daemon, the HTTP client below.
#[async_trait]
pub trait StatusSource: Send + Sync + 'static {
    async fn fetch_status(&self, id: &str) -> Result<StatusPayload, StatusFetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStatusSourceConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for HttpStatusSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_ms: 3_000,
        }
    }
}

pub struct HttpStatusSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStatusSource {
    pub fn new(config: &HttpStatusSourceConfig) -> Result<Self, StatusFetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|err| StatusFetchError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn status_url(&self, id: &str) -> String {
        format!("{}/api/investment_status/{}", self.base_url, id)
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self, id: &str) -> Result<StatusPayload, StatusFetchError> {
        let url = self.status_url(id);
        debug!(event = "status.request", investment_id = id, url = %url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| StatusFetchError::Transport(err.to_string()))?;

        let http_status = response.status();
        if !http_status.is_success() {
            return Err(StatusFetchError::HttpStatus(http_status.as_u16()));
        }

        let payload: StatusPayload = response
            .json()
            .await
            .map_err(|err| StatusFetchError::MalformedPayload(err.to_string()))?;
        payload
            .validate()
            .map_err(StatusFetchError::MalformedPayload)?;

        Ok(payload)
    }
}

//! HTTP client for the safety-scoring backend.

use crate::domain::{IngestPayload, IngestResponse};
use crate::error::{TrackingError, TrackingResult};
use crate::ports::IngestClient;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Backend endpoint and request policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: String,
    pub request_timeout: Duration,
    /// Total attempts per request, including the first.
    pub retry_attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub retry_backoff: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_millis(10_000),
            retry_attempts: 3,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

pub struct HttpIngestClient {
    http: reqwest::Client,
    config: BackendConfig,
}

impl HttpIngestClient {
    pub fn new(config: BackendConfig) -> TrackingResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    async fn with_retries<T, F, Fut>(&self, operation: &str, mut attempt: F) -> TrackingResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = TrackingResult<T>>,
    {
        let attempts = self.config.retry_attempts.max(1);
        let mut backoff = self.config.retry_backoff;
        let mut tried = 1;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && tried < attempts => {
                    warn!(operation, attempt = tried, error = %e, "[ts-04] Backend request failed, retrying");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    tried += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl IngestClient for HttpIngestClient {
    async fn send_location(&self, payload: &IngestPayload) -> TrackingResult<IngestResponse> {
        let url = self.endpoint("/ingest");
        debug!(url = %url, tourist_id = %payload.tourist_id, "[ts-04] Sending location");
        self.with_retries("ingest", || async {
            let response = self
                .http
                .post(&url)
                .json(payload)
                .send()
                .await?
                .error_for_status()?;
            Ok::<_, TrackingError>(response.json::<IngestResponse>().await?)
        })
        .await
    }

    async fn fetch_alerts(&self, only_alerts: bool) -> TrackingResult<Vec<serde_json::Value>> {
        let url = self.endpoint("/alerts");
        self.with_retries("alerts", || async {
            let response = self
                .http
                .get(&url)
                .query(&[("only_alerts", only_alerts)])
                .send()
                .await?
                .error_for_status()?;
            Ok::<_, TrackingError>(response.json::<Vec<serde_json::Value>>().await?)
        })
        .await
    }
}

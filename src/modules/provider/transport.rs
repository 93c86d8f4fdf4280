//! HTTP transport seam for the fetch pipeline.
//!
//! The trait exists so the retry/caching logic can be exercised against
//! scripted responses without touching the network.

use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Raw upstream reply, before any JSON handling.
#[derive(Debug, Clone)]
pub struct TransportReply {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a single GET; transport-level failures (connect, timeout)
    /// surface as errors, HTTP error statuses come back as replies.
    async fn get(&self, url: &str, timeout: Duration) -> AppResult<TransportReply>;
}

/// Production transport backed by reqwest.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> AppResult<Self> {
        let client = Client::builder()
            .user_agent("mitsu/1.0")
            .build()
            .map_err(|e| AppError::ExternalServiceError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, timeout: Duration) -> AppResult<TransportReply> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportReply { status, body })
    }
}

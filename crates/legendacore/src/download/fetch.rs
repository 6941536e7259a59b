use async_trait::async_trait;
use std::time::Duration;

use crate::core::config;
use crate::core::error::AppError;

/// Downloads a caption payload as text.
#[async_trait]
pub trait PayloadFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, AppError>;
}

/// `reqwest`-backed fetcher with a fixed timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with the configured payload timeout.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` if the HTTP client cannot be built (TLS backend).
    pub fn new() -> Result<Self, AppError> {
        Self::with_timeout(config::network::fetch_timeout())
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::FetchFailed(format!("HTTP client error: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PayloadFetcher for HttpFetcher {
    /// Fetches the caption payload.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` if:
    /// - the HTTP request fails (DNS, timeout, connection reset)
    /// - the response status is not 2xx
    /// - the body cannot be decoded as text
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::FetchFailed(format!("HTTP request failed with status: {}", status)));
        }

        let body = resp.text().await?;
        log::debug!("Fetched caption payload: {} bytes", body.len());
        Ok(body)
    }
}

//! Retry policy for rate-limited metadata extraction.
//!
//! Only `RateLimited` is retried. Every other extractor failure ends the call
//! immediately. On the first retry the policy may switch the extraction to an
//! authenticated session (cookies); if that switch cannot be made the retries
//! continue anonymously.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config;
use crate::core::error::AppError;
use crate::download::cookies::escalate_to_authenticated;
use crate::download::error::ExtractError;
use crate::download::metadata::{ExtractOptions, MetadataExtractor, VideoMetadata};

pub type BackoffFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;
pub type EscalationFn = Arc<dyn Fn(&ExtractOptions) -> Result<ExtractOptions, AppError> + Send + Sync>;

/// Bounded retry with linear backoff and optional credential escalation.
#[derive(Clone)]
pub struct RateLimitRetry {
    /// Total extraction attempts, first one included
    max_retries: u32,
    backoff: BackoffFn,
    escalation: Option<EscalationFn>,
}

impl Default for RateLimitRetry {
    /// 3 attempts, `(i + 1) * 5s` backoff, cookie escalation from env config.
    fn default() -> Self {
        Self {
            max_retries: config::retry::MAX_RETRIES,
            backoff: Arc::new(config::retry::backoff_for_attempt),
            escalation: Some(Arc::new(escalate_to_authenticated)),
        }
    }
}

impl fmt::Debug for RateLimitRetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimitRetry")
            .field("max_retries", &self.max_retries)
            .field("escalation", &self.escalation.is_some())
            .finish()
    }
}

impl RateLimitRetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the total number of attempts. Values below 1 are treated as 1.
    #[must_use]
    pub fn max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    #[must_use]
    pub fn backoff<F>(mut self, backoff: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        self.backoff = Arc::new(backoff);
        self
    }

    #[must_use]
    pub fn escalation<F>(mut self, escalation: F) -> Self
    where
        F: Fn(&ExtractOptions) -> Result<ExtractOptions, AppError> + Send + Sync + 'static,
    {
        self.escalation = Some(Arc::new(escalation));
        self
    }

    /// Keeps every attempt on the original options.
    #[must_use]
    pub fn no_escalation(mut self) -> Self {
        self.escalation = None;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        (self.backoff)(attempt)
    }

    /// Runs the extractor under this policy.
    ///
    /// # Errors
    ///
    /// - `RateLimitExceeded` once every attempt was rate limited
    /// - `VideoUnavailable` / `InvalidInput` / `ExtractionFailed` on the first
    ///   non rate-limit failure, without retrying
    pub async fn extract(
        &self,
        extractor: &dyn MetadataExtractor,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<VideoMetadata, AppError> {
        let attempts = self.attempts();
        let mut current = options.clone();

        for attempt in 0..attempts {
            match extractor.extract(url, &current).await {
                Ok(metadata) => {
                    if attempt > 0 {
                        log::info!(
                            "{} succeeded on attempt {}/{} for {}",
                            extractor.name(),
                            attempt + 1,
                            attempts,
                            url
                        );
                    }
                    return Ok(metadata);
                }
                Err(ExtractError::RateLimited(msg)) => {
                    if attempt + 1 >= attempts {
                        log::error!(
                            "Rate limited on final attempt {}/{} for {}: {}",
                            attempt + 1,
                            attempts,
                            url,
                            msg
                        );
                        break;
                    }

                    let delay = self.delay_for_attempt(attempt);
                    log::warn!(
                        "Rate limited (attempt {}/{}), retrying in {:?}: {}",
                        attempt + 1,
                        attempts,
                        delay,
                        msg
                    );
                    tokio::time::sleep(delay).await;

                    if attempt == 0 {
                        current = self.escalate(current);
                    }
                }
                Err(other) => return Err(terminal_error(other)),
            }
        }

        Err(AppError::RateLimitExceeded { attempts })
    }

    fn escalate(&self, options: ExtractOptions) -> ExtractOptions {
        let Some(hook) = &self.escalation else {
            return options;
        };
        if options.is_authenticated() {
            log::debug!("Extraction already uses {:?}, keeping it for the retry", options.auth);
            return options;
        }
        match hook(&options) {
            Ok(escalated) => escalated,
            Err(e) => {
                log::warn!("Could not switch to authenticated extraction, continuing without it: {}", e);
                options
            }
        }
    }
}

fn terminal_error(err: ExtractError) -> AppError {
    match err {
        ExtractError::VideoUnavailable(msg) => AppError::VideoUnavailable(msg),
        ExtractError::InvalidUrl(msg) => AppError::InvalidInput(msg),
        other => AppError::ExtractionFailed(other.to_string()),
    }
}

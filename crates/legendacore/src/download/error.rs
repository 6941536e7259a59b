use std::fmt;

/// Structured error type for metadata extraction.
///
/// The retry controller only needs to tell these categories apart: rate
/// limiting is retried, everything else is surfaced immediately.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// Platform answered HTTP 429 / "Too Many Requests"
    RateLimited(String),
    /// Private, removed or region-blocked video
    VideoUnavailable(String),
    /// The extractor rejected the URL itself
    InvalidUrl(String),
    /// Extraction did not finish in time
    Timeout(String),
    /// Process execution failure (spawn, unreadable output)
    Process(String),
    /// Catch-all for uncategorized errors
    Other(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ExtractError {}

impl ExtractError {
    /// Returns subcategory for logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            ExtractError::RateLimited(_) => "rate_limited",
            ExtractError::VideoUnavailable(_) => "video_unavailable",
            ExtractError::InvalidUrl(_) => "invalid_url",
            ExtractError::Timeout(_) => "timeout",
            ExtractError::Process(_) => "process",
            ExtractError::Other(_) => "other",
        }
    }

    /// Returns the inner message
    pub fn message(&self) -> &str {
        match self {
            ExtractError::RateLimited(msg)
            | ExtractError::VideoUnavailable(msg)
            | ExtractError::InvalidUrl(msg)
            | ExtractError::Timeout(msg)
            | ExtractError::Process(msg)
            | ExtractError::Other(msg) => msg,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ExtractError::RateLimited(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_display() {
        let err = ExtractError::RateLimited("HTTP Error 429: Too Many Requests".into());
        assert_eq!(err.to_string(), "HTTP Error 429: Too Many Requests");
    }

    #[test]
    fn test_extract_error_subcategory() {
        assert_eq!(ExtractError::RateLimited("".into()).subcategory(), "rate_limited");
        assert_eq!(ExtractError::VideoUnavailable("".into()).subcategory(), "video_unavailable");
        assert_eq!(ExtractError::InvalidUrl("".into()).subcategory(), "invalid_url");
        assert_eq!(ExtractError::Timeout("".into()).subcategory(), "timeout");
        assert_eq!(ExtractError::Other("".into()).subcategory(), "other");
    }

    #[test]
    fn test_message_and_rate_limit_flag() {
        let err = ExtractError::Other("boom".into());
        assert!(!err.is_rate_limited());
        assert_eq!(err.message(), "boom");
        assert!(ExtractError::RateLimited("429".into()).is_rate_limited());
    }
}

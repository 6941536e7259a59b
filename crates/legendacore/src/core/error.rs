use thiserror::Error;

/// Centralized error types for the caption pipeline
///
/// "No captions" is deliberately absent: a video without a usable track is a
/// successful call whose `Transcription::text` is `None`.
///
/// # Example
///
/// ```no_run
/// use legendacore::AppError;
///
/// fn status_for(err: &AppError) -> u16 {
///     match err {
///         AppError::InvalidInput(_) => 400,
///         AppError::VideoUnavailable(_) => 404,
///         _ => 500,
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed or non-YouTube URL
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The platform reports the video as private, removed or blocked
    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    /// Retry budget spent while the platform kept answering 429
    #[error("Rate limit exceeded after {attempts} attempt(s)")]
    RateLimitExceeded { attempts: u32 },

    /// Any other metadata extraction failure
    #[error("Metadata extraction failed: {0}")]
    ExtractionFailed(String),

    /// Caption payload download failed (transport error or non-2xx status)
    #[error("Caption download failed: {0}")]
    FetchFailed(String),

    /// Structured-event payload could not be parsed
    #[error("Malformed caption payload: {0}")]
    MalformedPayload(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::VideoUnavailable(_) => "video_unavailable",
            AppError::RateLimitExceeded { .. } => "rate_limit_exceeded",
            AppError::ExtractionFailed(_) => "extraction_failed",
            AppError::FetchFailed(_) => "fetch_failed",
            AppError::MalformedPayload(_) => "malformed_payload",
            AppError::Io(_) => "io",
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchFailed(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedPayload(err.to_string())
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

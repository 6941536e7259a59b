//! Classification of yt-dlp failures.
//!
//! yt-dlp reports everything through stderr text, so the category has to be
//! recovered by pattern matching before the retry controller can decide what
//! to do with it.

use crate::download::error::ExtractError;

/// yt-dlp error categories
#[derive(Debug, Clone, PartialEq)]
pub enum YtDlpErrorType {
    /// HTTP 429 / too many requests
    RateLimited,
    /// Video is private, removed or blocked
    VideoUnavailable,
    /// URL not accepted by any extractor
    InvalidUrl,
    /// Timeouts, DNS, connection resets
    NetworkError,
    /// Anything else
    Unknown,
}

/// Analyzes yt-dlp stderr and determines the error type
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorType {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("http error 429")
        || stderr_lower.contains("too many requests")
        || stderr_lower.contains("rate-limited")
        || stderr_lower.contains("rate limited")
    {
        return YtDlpErrorType::RateLimited;
    }

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("this video is not available")
        || stderr_lower.contains("video is private")
        || stderr_lower.contains("video has been removed")
        || stderr_lower.contains("this video does not exist")
        || stderr_lower.contains("video is not available")
    {
        return YtDlpErrorType::VideoUnavailable;
    }

    if stderr_lower.contains("is not a valid url") || stderr_lower.contains("unsupported url") {
        return YtDlpErrorType::InvalidUrl;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("timeout")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network")
        || stderr_lower.contains("dns")
        || stderr_lower.contains("failed to connect")
    {
        return YtDlpErrorType::NetworkError;
    }

    YtDlpErrorType::Unknown
}

/// Pulls the most useful line out of yt-dlp stderr (the last `ERROR:` line,
/// otherwise the last non-empty line).
pub fn summarize_stderr(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "yt-dlp exited without output".to_string())
}

/// Maps raw stderr to the extractor error the retry controller understands
pub fn to_extract_error(stderr: &str) -> ExtractError {
    let summary = summarize_stderr(stderr);
    match analyze_ytdlp_error(stderr) {
        YtDlpErrorType::RateLimited => ExtractError::RateLimited(summary),
        YtDlpErrorType::VideoUnavailable => ExtractError::VideoUnavailable(summary),
        YtDlpErrorType::InvalidUrl => ExtractError::InvalidUrl(summary),
        YtDlpErrorType::NetworkError | YtDlpErrorType::Unknown => ExtractError::Other(summary),
    }
}

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Browser to extract cookies from when YouTube starts rate limiting us
/// Read from YTDL_COOKIES_BROWSER environment variable
/// Supported: chrome, firefox, safari, brave, chromium, edge, opera, vivaldi
///
/// Default: empty (no browser session reuse)
pub static YTDL_COOKIES_BROWSER: Lazy<String> =
    Lazy::new(|| env::var("YTDL_COOKIES_BROWSER").unwrap_or_else(|_| String::new()));

/// Path to a Netscape-format cookies file for authenticated extraction
/// Read from YTDL_COOKIES_FILE environment variable
/// If set, this takes priority over YTDL_COOKIES_BROWSER
pub static YTDL_COOKIES_FILE: Lazy<Option<String>> = Lazy::new(|| env::var("YTDL_COOKIES_FILE").ok());

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: legenda.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "legenda.log".to_string()));

/// Caption selection constants
pub mod captions {
    /// Language used when neither the caller nor the extractor names one
    pub const DEFAULT_LANGUAGE: &str = "pt";

    /// Second-chance language when the effective one has no track at all
    pub const FALLBACK_LANGUAGE: &str = "en";

    /// Extension of the structured-event (timed text JSON) format
    pub const JSON3_EXT: &str = "json3";

    /// Extension of the line-based WebVTT format
    pub const VTT_EXT: &str = "vtt";

    /// Format preference, best first
    pub const FORMAT_PREFERENCE: [&str; 2] = [JSON3_EXT, VTT_EXT];
}

/// Result cache configuration
pub mod cache {
    use once_cell::sync::Lazy;
    use std::env;
    use std::time::Duration;

    /// Time-to-live of a cached transcription (in seconds)
    /// Read from CACHE_TTL_SECS environment variable
    /// Default: 3600 (1 hour)
    pub static TTL_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600)
    });

    /// Cache TTL duration
    pub fn ttl() -> Duration {
        Duration::from_secs(*TTL_SECS)
    }
}

/// Retry configuration for rate-limited metadata extraction
pub mod retry {
    use super::Duration;

    /// Total extraction attempts before giving up with RateLimitExceeded
    pub const MAX_RETRIES: u32 = 3;

    /// Backoff step: attempt N (0-based) waits (N + 1) * step
    pub const BACKOFF_STEP_SECS: u64 = 5;

    /// Linear backoff for the given 0-based attempt index
    pub fn backoff_for_attempt(attempt_index: u32) -> Duration {
        Duration::from_secs((u64::from(attempt_index) + 1) * BACKOFF_STEP_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Socket timeout handed to yt-dlp (`--socket-timeout`, in seconds)
    pub const METADATA_SOCKET_TIMEOUT_SECS: u64 = 30;

    /// Hard limit for the whole yt-dlp process (in seconds)
    pub const METADATA_PROCESS_TIMEOUT_SECS: u64 = 120;

    /// Timeout for downloading the caption payload (in seconds)
    pub const FETCH_TIMEOUT_SECS: u64 = 30;

    /// yt-dlp socket timeout duration
    pub fn metadata_socket_timeout() -> Duration {
        Duration::from_secs(METADATA_SOCKET_TIMEOUT_SECS)
    }

    /// yt-dlp process timeout duration
    pub fn metadata_process_timeout() -> Duration {
        Duration::from_secs(METADATA_PROCESS_TIMEOUT_SECS)
    }

    /// Payload fetch timeout duration
    pub fn fetch_timeout() -> Duration {
        Duration::from_secs(FETCH_TIMEOUT_SECS)
    }
}

/// REST API configuration
pub mod web {
    use once_cell::sync::Lazy;
    use std::env;

    /// Interface the API binds to
    /// Read from WEB_HOST environment variable
    /// Default: 0.0.0.0
    pub static HOST: Lazy<String> = Lazy::new(|| env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()));

    /// Port for the REST API
    /// Read from WEB_PORT environment variable
    /// Default: 5000
    pub static PORT: Lazy<u16> = Lazy::new(|| {
        env::var("WEB_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_is_linear_in_five_second_steps() {
        assert_eq!(retry::backoff_for_attempt(0), Duration::from_secs(5));
        assert_eq!(retry::backoff_for_attempt(1), Duration::from_secs(10));
        assert_eq!(retry::backoff_for_attempt(2), Duration::from_secs(15));
    }

    #[test]
    fn test_format_preference_order() {
        assert_eq!(captions::FORMAT_PREFERENCE, ["json3", "vtt"]);
    }
}

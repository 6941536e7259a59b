//! URL and filename validation utilities
//!
//! - YouTube URL validation (whitelist-based), run by the presentation layers
//!   before the core is invoked
//! - Title sanitization for transcript file names

use url::Url;

use crate::core::error::AppError;

/// Validates that a URL points at YouTube.
///
/// # Security
/// Uses whitelist approach:
/// - Only HTTP/HTTPS schemes allowed
/// - Only youtube.com, youtu.be, youtube-nocookie.com domains (+ subdomains)
///
/// # Examples
/// ```
/// use legendacore::core::validation::validate_video_url;
///
/// assert!(validate_video_url("https://youtube.com/watch?v=dQw4w9WgXcQ").is_ok());
/// assert!(validate_video_url("https://youtu.be/dQw4w9WgXcQ").is_ok());
///
/// assert!(validate_video_url("https://evil.com/watch?v=dQw4w9WgXcQ").is_err());
/// assert!(validate_video_url("ftp://youtube.com/video").is_err());
/// assert!(validate_video_url("not a url").is_err());
/// ```
pub fn validate_video_url(url: &str) -> Result<Url, AppError> {
    let parsed = Url::parse(url.trim()).map_err(|_| AppError::InvalidInput(format!("{} is not a valid URL", url)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::InvalidInput(format!(
            "{} (invalid scheme: {})",
            url,
            parsed.scheme()
        )));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::InvalidInput(format!("{} (no host)", url)))?
        .to_ascii_lowercase();

    let is_youtube = host == "youtube.com"
        || host.ends_with(".youtube.com")
        || host == "youtu.be"
        || host == "youtube-nocookie.com"
        || host.ends_with(".youtube-nocookie.com");

    if !is_youtube {
        return Err(AppError::InvalidInput(format!(
            "{} (not a YouTube domain: {})",
            url, host
        )));
    }

    Ok(parsed)
}

/// Turns a video title into a file stem.
///
/// Keeps alphanumerics (any script), spaces, `-` and `_`; trailing whitespace
/// is dropped. Falls back to `"video"` when nothing survives.
///
/// ```
/// use legendacore::core::validation::safe_title;
///
/// assert_eq!(safe_title("My Video: Part 1?"), "My Video Part 1");
/// assert_eq!(safe_title("???"), "video");
/// ```
pub fn safe_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let trimmed = kept.trim_end();
    if trimmed.trim_start().is_empty() {
        "video".to_string()
    } else {
        trimmed.to_string()
    }
}

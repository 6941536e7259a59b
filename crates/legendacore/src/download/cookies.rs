//! Cookie-based credential escalation for yt-dlp.
//!
//! Extraction starts anonymously. When YouTube starts answering 429 the retry
//! controller asks this module for an authenticated variant of the options:
//! - Priority 1: `YTDL_COOKIES_FILE` (must exist on disk)
//! - Priority 2: `YTDL_COOKIES_BROWSER` (`--cookies-from-browser`)

use std::path::{Path, PathBuf};

use crate::core::config;
use crate::core::error::AppError;
use crate::download::metadata::{AuthMode, ExtractOptions};

/// Expands `~` and canonicalizes a cookies file path.
///
/// Returns `None` when the file does not exist.
pub fn resolve_cookies_path(cookies_file: &str) -> Option<PathBuf> {
    let trimmed = cookies_file.trim();
    if trimmed.is_empty() {
        return None;
    }

    let expanded = if Path::new(trimmed).is_absolute() {
        trimmed.to_string()
    } else {
        shellexpand::tilde(trimmed).to_string()
    };

    let path = Path::new(&expanded);
    if !path.exists() {
        return None;
    }
    path.canonicalize().ok()
}

/// Picks the authentication mode from explicit settings.
pub fn auth_mode_from(cookies_file: Option<&str>, browser: &str) -> Result<AuthMode, AppError> {
    if let Some(raw) = cookies_file.filter(|f| !f.trim().is_empty()) {
        match resolve_cookies_path(raw) {
            Some(path) => return Ok(AuthMode::CookiesFile(path)),
            None => log::warn!("Cookies file not found: {}, trying browser cookies", raw),
        }
    }

    let browser = browser.trim();
    if !browser.is_empty() {
        return Ok(AuthMode::Browser(browser.to_string()));
    }

    Err(AppError::ExtractionFailed(
        "no cookies configured (set YTDL_COOKIES_FILE or YTDL_COOKIES_BROWSER)".to_string(),
    ))
}

/// Default escalation hook: switches the options to an authenticated session
/// using the process configuration.
pub fn escalate_to_authenticated(options: &ExtractOptions) -> Result<ExtractOptions, AppError> {
    let auth = auth_mode_from(config::YTDL_COOKIES_FILE.as_deref(), config::YTDL_COOKIES_BROWSER.as_str())?;
    log::info!("Escalating extraction to authenticated session: {:?}", auth);
    Ok(options.clone().with_auth(auth))
}

/// Appends the yt-dlp arguments for the given authentication mode.
pub fn add_auth_args(args: &mut Vec<String>, auth: &AuthMode) {
    match auth {
        AuthMode::Anonymous => {}
        AuthMode::CookiesFile(path) => {
            args.push("--cookies".to_string());
            args.push(path.to_string_lossy().to_string());
        }
        AuthMode::Browser(browser) => {
            args.push("--cookies-from-browser".to_string());
            args.push(browser.clone());
        }
    }
}

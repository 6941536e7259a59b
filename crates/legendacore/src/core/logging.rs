//! Logging initialization and configuration checking
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Cookies configuration report at startup

use anyhow::Result;
use simplelog::*;
use std::fs::File;

use crate::core::config;
use crate::download::cookies::resolve_cookies_path;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger was already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs which credentials are available for rate-limit escalation
///
/// Extraction always starts anonymously; cookies only matter once YouTube
/// answers 429, so a missing configuration is a warning, not an error.
pub fn log_cookies_configuration() {
    log::info!("Cookies configuration (used only after a rate-limited attempt):");

    match config::YTDL_COOKIES_FILE.as_deref() {
        Some(raw) if !raw.trim().is_empty() => match resolve_cookies_path(raw) {
            Some(path) => log::info!("  YTDL_COOKIES_FILE: {}", path.display()),
            None => log::error!("  YTDL_COOKIES_FILE: {} (FILE NOT FOUND)", raw),
        },
        Some(_) => log::warn!("  YTDL_COOKIES_FILE is set but empty"),
        None => log::info!("  YTDL_COOKIES_FILE: not set"),
    }

    let browser = config::YTDL_COOKIES_BROWSER.as_str();
    if browser.is_empty() {
        log::info!("  YTDL_COOKIES_BROWSER: not set");
    } else {
        log::info!("  YTDL_COOKIES_BROWSER: {}", browser);
    }

    if config::YTDL_COOKIES_FILE.is_none() && browser.is_empty() {
        log::warn!("No cookies configured: rate-limited requests will be retried anonymously");
    }
}

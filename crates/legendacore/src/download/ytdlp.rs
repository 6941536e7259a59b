//! yt-dlp backed metadata extractor.

use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::core::config;
use crate::download::cookies::add_auth_args;
use crate::download::error::ExtractError;
use crate::download::metadata::{ExtractOptions, MetadataExtractor, VideoMetadata};
use crate::download::ytdlp_errors::to_extract_error;

/// Runs `yt-dlp --dump-json` and parses title, language and caption tracks.
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    ytdl_bin: String,
    process_timeout: Duration,
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpExtractor {
    /// Uses `YTDL_BIN` and the configured process timeout.
    pub fn new() -> Self {
        Self {
            ytdl_bin: config::YTDL_BIN.clone(),
            process_timeout: config::network::metadata_process_timeout(),
        }
    }

    #[must_use]
    pub fn with_binary(mut self, ytdl_bin: impl Into<String>) -> Self {
        self.ytdl_bin = ytdl_bin.into();
        self
    }

    #[must_use]
    pub fn with_process_timeout(mut self, process_timeout: Duration) -> Self {
        self.process_timeout = process_timeout;
        self
    }

    /// Builds the argument list for a metadata-only run.
    pub fn build_args(url: &str, options: &ExtractOptions) -> Vec<String> {
        let mut args: Vec<String> = [
            "--dump-json",
            "--no-playlist",
            "--skip-download",
            "--no-warnings",
            "--extractor-args",
            "youtube:skip=dash,hls",
            "--socket-timeout",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        args.push(options.socket_timeout.as_secs().max(1).to_string());

        add_auth_args(&mut args, &options.auth);
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl MetadataExtractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn extract(&self, url: &str, options: &ExtractOptions) -> Result<VideoMetadata, ExtractError> {
        let args = Self::build_args(url, options);
        log::debug!("yt-dlp command for caption metadata: {} {}", self.ytdl_bin, args.join(" "));

        let output = match timeout(
            self.process_timeout,
            TokioCommand::new(&self.ytdl_bin).args(&args).kill_on_drop(true).output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(ExtractError::Process(format!(
                    "Failed to execute {}: {}",
                    self.ytdl_bin, e
                )))
            }
            Err(_) => {
                return Err(ExtractError::Timeout(format!(
                    "yt-dlp did not finish within {:?}",
                    self.process_timeout
                )))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let err = to_extract_error(&stderr);
            log::warn!(
                "yt-dlp metadata failed ({}, auth: {:?}): {}",
                err.subcategory(),
                options.auth,
                err
            );
            return Err(err);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        VideoMetadata::from_ytdlp_json(&stdout)
            .map_err(|e| ExtractError::Process(format!("Failed to parse yt-dlp JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::metadata::AuthMode;

    #[test]
    fn test_build_args_anonymous() {
        let args = YtDlpExtractor::build_args("https://youtu.be/abc", &ExtractOptions::default());
        assert_eq!(args.first().map(String::as_str), Some("--dump-json"));
        assert_eq!(args.last().map(String::as_str), Some("https://youtu.be/abc"));
        let pos = args.iter().position(|a| a == "--socket-timeout").unwrap();
        assert_eq!(args[pos + 1], "30");
        assert!(!args.iter().any(|a| a.starts_with("--cookies")));
    }

    #[test]
    fn test_build_args_with_browser_cookies() {
        let opts = ExtractOptions::default().with_auth(AuthMode::Browser("firefox".into()));
        let args = YtDlpExtractor::build_args("https://youtu.be/abc", &opts);
        let pos = args.iter().position(|a| a == "--cookies-from-browser").unwrap();
        assert_eq!(args[pos + 1], "firefox");
        assert_eq!(args.last().map(String::as_str), Some("https://youtu.be/abc"));
    }

    #[tokio::test]
    async fn test_missing_binary_is_process_error() {
        let extractor = YtDlpExtractor::new().with_binary("/nonexistent/yt-dlp-binary");
        let err = extractor
            .extract("https://youtu.be/abc", &ExtractOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Process(_)));
    }
}

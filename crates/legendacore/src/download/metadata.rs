//! Video metadata model and the extractor seam.
//!
//! The production extractor shells out to yt-dlp (see `download::ytdlp`);
//! tests plug in fakes through the `MetadataExtractor` trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::config;
use crate::download::error::ExtractError;

/// Per-language caption tracks: language code → available formats
pub type TrackMap = HashMap<String, Vec<TrackDescriptor>>;

/// One format variant of a caption track (e.g. json3, vtt, srv1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    #[serde(rename = "ext", default)]
    pub extension: String,
    /// Empty when the extractor lists the format without a downloadable URL
    #[serde(rename = "url", default)]
    pub fetch_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TrackDescriptor {
    pub fn new(extension: impl Into<String>, fetch_url: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            fetch_url: fetch_url.into(),
            name: None,
        }
    }

    pub fn has_url(&self) -> bool {
        !self.fetch_url.trim().is_empty()
    }
}

/// What the extractor knows about a video, produced once per extraction call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VideoMetadata {
    pub title: String,
    pub detected_language: Option<String>,
    pub manual_tracks: TrackMap,
    pub auto_tracks: TrackMap,
}

/// Shape of the fields we read from `yt-dlp --dump-json`.
#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    subtitles: Option<TrackMap>,
    #[serde(default)]
    automatic_captions: Option<TrackMap>,
}

impl VideoMetadata {
    /// Title used when the extractor does not report one
    pub const UNTITLED: &'static str = "video";

    /// Parses the JSON document printed by `yt-dlp --dump-json`.
    pub fn from_ytdlp_json(json: &str) -> Result<Self, serde_json::Error> {
        let info: YtDlpInfo = serde_json::from_str(json)?;
        Ok(Self {
            title: info
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| Self::UNTITLED.to_string()),
            detected_language: info.language.filter(|l| !l.trim().is_empty()),
            manual_tracks: info.subtitles.unwrap_or_default(),
            auto_tracks: info.automatic_captions.unwrap_or_default(),
        })
    }
}

/// Credentials handed to the extractor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// No cookies at all (first attempt)
    #[default]
    Anonymous,
    /// Netscape cookies file
    CookiesFile(PathBuf),
    /// Reuse a local browser session (`--cookies-from-browser`)
    Browser(String),
}

/// Per-call extraction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub socket_timeout: Duration,
    pub auth: AuthMode,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            socket_timeout: config::network::metadata_socket_timeout(),
            auth: AuthMode::Anonymous,
        }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn with_auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth != AuthMode::Anonymous
    }
}

/// Source of video metadata (title, language, caption tracks).
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Human-readable name of this extractor (e.g., "yt-dlp")
    fn name(&self) -> &str;

    /// Extracts metadata without downloading any media.
    async fn extract(&self, url: &str, options: &ExtractOptions) -> Result<VideoMetadata, ExtractError>;
}

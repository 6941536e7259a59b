//! Upstream access: metadata extraction, credentials, payload download.
//!
//! Built-in backends:
//! - `YtDlpExtractor`: `yt-dlp --dump-json` for title, language and caption tracks
//! - `HttpFetcher`: plain GET of the selected caption URL

pub mod cookies;
pub mod error;
pub mod fetch;
pub mod metadata;
pub mod ytdlp;
pub mod ytdlp_errors;

pub use error::ExtractError;
pub use fetch::{HttpFetcher, PayloadFetcher};
pub use metadata::{AuthMode, ExtractOptions, MetadataExtractor, TrackDescriptor, TrackMap, VideoMetadata};
pub use ytdlp::YtDlpExtractor;

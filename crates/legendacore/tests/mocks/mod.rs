//! In-memory stand-ins for the upstream collaborators
//!
//! Lets the pipeline tests run without yt-dlp or network access.

pub mod mock_upstream;

pub use mock_upstream::{MockExtractor, MockFetcher};

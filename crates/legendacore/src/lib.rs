//! legendacore - caption extraction core for legenda
//!
//! Turns a YouTube video URL into clean plain text built from the captions the
//! platform already provides.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, retry policy, URL validation
//! - `download`: metadata extraction (yt-dlp), cookies escalation, payload fetch
//! - `subtitles`: track selection, format normalization, text cleaning
//! - `storage`: in-process result cache with TTL
//! - `transcribe`: the orchestrator tying everything together

pub mod core;
pub mod download;
pub mod storage;
pub mod subtitles;
pub mod transcribe;

// Re-export commonly used types for convenience
pub use crate::core::error::{AppError, AppResult};
pub use download::metadata::{TrackDescriptor, VideoMetadata};
pub use transcribe::{save_transcription, Transcriber, Transcription};

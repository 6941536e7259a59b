//! In-process storage for finished transcriptions.

pub mod cache;

pub use cache::{
    CacheKey, CacheStats, CachedTranscript, Clock, ManualClock, ResultCache, SystemClock, TranscriptCache,
};

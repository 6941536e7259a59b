use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::core::config;

/// Time source for entry expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Used to test expiry without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset_ms: AtomicU64,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_ms: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.offset_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + Duration::from_millis(self.offset_ms.load(Ordering::SeqCst))
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// `(video URL, requested language)`. `None` and `Some("pt")` are different keys
/// even when they resolve to the same track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub url: String,
    pub lang: Option<String>,
}

impl CacheKey {
    pub fn new(url: &str, lang: Option<&str>) -> Self {
        Self {
            url: url.to_string(),
            lang: lang.map(str::to_string),
        }
    }
}

/// A finished transcription as stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedTranscript {
    pub text: String,
    pub title: String,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    transcript: CachedTranscript,
    inserted_at: Instant,
}

/// Storage seam for finished transcriptions.
///
/// The in-process [`TranscriptCache`] is the default; a key-value store
/// implementation can be dropped in without touching the orchestrator.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, key: &CacheKey) -> Option<CachedTranscript>;
    async fn put(&self, key: CacheKey, transcript: CachedTranscript);

    /// Drops every expired entry. Returns how many were removed.
    ///
    /// Stores that expire entries on their own keep the default no-op.
    async fn cleanup(&self) -> usize {
        0
    }
}

/// TTL cache of transcriptions.
///
/// Entries expire once `now - inserted_at >= ttl` and are dropped lazily on
/// the next lookup. Concurrent misses on the same key are not coalesced; the
/// last writer wins.
pub struct TranscriptCache<C: Clock = SystemClock> {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    clock: C,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl TranscriptCache<SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl Default for TranscriptCache<SystemClock> {
    /// Uses `CACHE_TTL_SECS` (default 1 hour).
    fn default() -> Self {
        Self::new(config::cache::ttl())
    }
}

impl<C: Clock> TranscriptCache<C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_live(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) < self.ttl
    }

    pub async fn stats(&self) -> CacheStats {
        let size = self.entries.lock().await.len();
        let hits = self.hit_count.load(Ordering::Relaxed);
        let misses = self.miss_count.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            size,
            hits,
            misses,
            hit_rate,
        }
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
        self.hit_count.store(0, Ordering::Relaxed);
        self.miss_count.store(0, Ordering::Relaxed);
        log::info!("Transcript cache cleared");
    }
}

#[async_trait]
impl<C: Clock> ResultCache for TranscriptCache<C> {
    async fn get(&self, key: &CacheKey) -> Option<CachedTranscript> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get(key) {
            if self.is_live(entry, now) {
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                return Some(entry.transcript.clone());
            }
            entries.remove(key);
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn put(&self, key: CacheKey, transcript: CachedTranscript) {
        let inserted_at = self.clock.now();
        self.entries.lock().await.insert(key, CacheEntry { transcript, inserted_at });
    }

    async fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| self.is_live(entry, now));
        let removed = before - entries.len();
        log::debug!("Cleaned up {} expired transcript cache entries", removed);
        removed
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

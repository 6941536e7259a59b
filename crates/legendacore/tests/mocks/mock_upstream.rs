//! Scripted extractor and map-backed fetcher

#![allow(dead_code)]

use async_trait::async_trait;
use legendacore::download::{ExtractError, ExtractOptions, MetadataExtractor, PayloadFetcher, TrackDescriptor};
use legendacore::{AppError, VideoMetadata};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Plays back queued results, then repeats `fallback` forever.
pub struct MockExtractor {
    queue: Mutex<VecDeque<Result<VideoMetadata, ExtractError>>>,
    fallback: Result<VideoMetadata, ExtractError>,
    calls: AtomicU32,
}

impl MockExtractor {
    pub fn returning(metadata: VideoMetadata) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Ok(metadata),
            calls: AtomicU32::new(0),
        }
    }

    pub fn failing(err: ExtractError) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Err(err),
            calls: AtomicU32::new(0),
        }
    }

    pub fn then(self, result: Result<VideoMetadata, ExtractError>) -> Self {
        self.queue.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, _url: &str, _options: &ExtractOptions) -> Result<VideoMetadata, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let queued = self.queue.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Serves bodies by URL; unknown URLs fail like a 404.
#[derive(Default)]
pub struct MockFetcher {
    bodies: HashMap<String, String>,
    calls: AtomicU32,
}

impl MockFetcher {
    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PayloadFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::FetchFailed("HTTP request failed with status: 404 Not Found".to_string()))
    }
}

pub fn track(ext: &str, url: &str) -> TrackDescriptor {
    TrackDescriptor::new(ext, url)
}

pub fn video(title: &str, detected: Option<&str>) -> VideoMetadata {
    VideoMetadata {
        title: title.to_string(),
        detected_language: detected.map(str::to_string),
        manual_tracks: HashMap::new(),
        auto_tracks: HashMap::new(),
    }
}

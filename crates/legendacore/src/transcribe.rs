//! `download_subtitles`: URL in, cleaned caption text out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::core::retry::RateLimitRetry;
use crate::core::validation::safe_title;
use crate::download::fetch::{HttpFetcher, PayloadFetcher};
use crate::download::metadata::{ExtractOptions, MetadataExtractor};
use crate::download::ytdlp::YtDlpExtractor;
use crate::storage::cache::{CacheKey, CachedTranscript, ResultCache, TranscriptCache};
use crate::subtitles::select::effective_language;
use crate::subtitles::{select_track, to_clean_text};

/// Outcome of a caption download.
///
/// `text` is `None` when the video has no usable captions. That is a normal
/// result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription {
    pub text: Option<String>,
    pub title: String,
}

impl Transcription {
    pub fn none(title: impl Into<String>) -> Self {
        Self {
            text: None,
            title: title.into(),
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn word_count(&self) -> usize {
        self.text.as_deref().map_or(0, |t| t.split_whitespace().count())
    }

    pub fn char_count(&self) -> usize {
        self.text.as_deref().map_or(0, |t| t.chars().count())
    }
}

impl From<CachedTranscript> for Transcription {
    fn from(cached: CachedTranscript) -> Self {
        Self {
            text: Some(cached.text),
            title: cached.title,
        }
    }
}

/// Caption pipeline: cache → extraction (with retry) → selection → fetch →
/// normalize + clean → cache.
pub struct Transcriber {
    extractor: Arc<dyn MetadataExtractor>,
    fetcher: Arc<dyn PayloadFetcher>,
    cache: Arc<dyn ResultCache>,
    retry: RateLimitRetry,
    options: ExtractOptions,
}

impl Transcriber {
    /// Builds a transcriber around the given upstream collaborators with the
    /// default cache, retry policy and anonymous extraction options.
    pub fn new(extractor: Arc<dyn MetadataExtractor>, fetcher: Arc<dyn PayloadFetcher>) -> Self {
        Self {
            extractor,
            fetcher,
            cache: Arc::new(TranscriptCache::default()),
            retry: RateLimitRetry::default(),
            options: ExtractOptions::default(),
        }
    }

    /// yt-dlp extractor + reqwest fetcher, configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` if the HTTP client cannot be built.
    pub fn with_defaults() -> Result<Self, AppError> {
        Ok(Self::new(Arc::new(YtDlpExtractor::new()), Arc::new(HttpFetcher::new()?)))
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RateLimitRetry) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Downloads and cleans the captions of one video.
    ///
    /// `lang` is the requested caption language; when `None` the video's
    /// detected language is used, then `pt`. English is tried when the
    /// effective language has no track.
    ///
    /// # Errors
    ///
    /// - `RateLimitExceeded`, `VideoUnavailable`, `InvalidInput`,
    ///   `ExtractionFailed` from metadata extraction
    /// - `FetchFailed` if the caption payload cannot be downloaded
    /// - `MalformedPayload` if a json3 payload cannot be parsed
    pub async fn download_subtitles(&self, url: &str, lang: Option<&str>) -> Result<Transcription, AppError> {
        let key = CacheKey::new(url, lang);
        if let Some(cached) = self.cache.get(&key).await {
            log::debug!("Transcript cache hit for {} (lang: {:?})", url, lang);
            return Ok(cached.into());
        }

        log::info!("Checking available captions for {} via {}", url, self.extractor.name());
        let metadata = self.retry.extract(self.extractor.as_ref(), url, &self.options).await?;

        let Some(selection) = select_track(
            &metadata.manual_tracks,
            &metadata.auto_tracks,
            lang,
            metadata.detected_language.as_deref(),
        ) else {
            log::warn!(
                "No captions for '{}' (requested: {:?}, detected: {:?})",
                metadata.title,
                lang,
                metadata.detected_language
            );
            return Ok(Transcription::none(metadata.title));
        };

        if selection.source.is_fallback() {
            log::warn!(
                "No captions in '{}' for '{}', falling back to English",
                effective_language(lang, metadata.detected_language.as_deref()),
                metadata.title
            );
        }
        log::info!(
            "Downloading {} captions [{}] (format: {})",
            selection.source,
            selection.language,
            selection.descriptor.extension
        );
        let raw = self.fetcher.fetch(&selection.descriptor.fetch_url).await?;
        let text = to_clean_text(&selection.descriptor.extension, &raw)?;

        if text.is_empty() {
            log::warn!("Captions for '{}' were empty after cleaning", metadata.title);
            return Ok(Transcription::none(metadata.title));
        }

        self.cache
            .put(
                key,
                CachedTranscript {
                    text: text.clone(),
                    title: metadata.title.clone(),
                },
            )
            .await;

        Ok(Transcription {
            text: Some(text),
            title: metadata.title,
        })
    }

    /// Evicts expired transcriptions. Returns how many were removed.
    pub async fn cleanup_cache(&self) -> usize {
        self.cache.cleanup().await
    }
}

/// Writes `text` to `<dir>/<safe title>.txt`, creating `dir` if needed.
///
/// # Errors
///
/// Returns `Io` if the directory or file cannot be written.
pub fn save_transcription(text: &str, title: &str, dir: &Path) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.txt", safe_title(title)));
    std::fs::write(&path, text)?;
    Ok(path)
}

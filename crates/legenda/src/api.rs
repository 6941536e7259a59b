//! REST API over the caption pipeline.
//!
//! - `GET /health` → `{"status":"ok"}`
//! - `POST /transcribe` `{url, lang?}` → `{title, transcription, word_count, char_count}`

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

use legendacore::core::config;
use legendacore::core::validation::validate_video_url;
use legendacore::{AppError, Transcriber};

#[derive(Clone)]
struct ApiState {
    transcriber: Arc<Transcriber>,
}

#[derive(Debug, Deserialize)]
struct TranscribeRequest {
    url: Option<String>,
    lang: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranscribeResponse {
    title: String,
    transcription: String,
    word_count: usize,
    char_count: usize,
}

/// Error body `{"error": message}` with its status code.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn no_captions() -> Self {
        Self::new(StatusCode::NOT_FOUND, "No captions available for this video.")
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidInput(_) => Self::new(StatusCode::BAD_REQUEST, "Invalid URL."),
            AppError::VideoUnavailable(_) => Self::new(StatusCode::NOT_FOUND, "Video unavailable or private."),
            other => {
                log::error!("Transcription failed ({}): {}", other.kind(), other);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Error: {}", other))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub fn router(transcriber: Arc<Transcriber>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/transcribe", post(transcribe_handler))
        .layer(CorsLayer::permissive())
        .with_state(ApiState { transcriber })
}

/// Evicts expired transcriptions once per `every` until aborted.
fn spawn_cache_cleanup(transcriber: Arc<Transcriber>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        // interval() panics on a zero period (CACHE_TTL_SECS=0)
        let mut ticker = tokio::time::interval(every.max(Duration::from_secs(1)));
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = transcriber.cleanup_cache().await;
            if removed > 0 {
                log::info!("Evicted {} expired transcriptions from cache", removed);
            }
        }
    })
}

/// Binds `host:port` and serves until Ctrl+C.
pub async fn start_api_server(host: &str, port: u16, transcriber: Arc<Transcriber>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    log::info!("Starting API server on http://{}", addr);
    log::info!("  GET  /health      - Health check");
    log::info!("  POST /transcribe  - Download captions as text");

    let cleanup = spawn_cache_cleanup(Arc::clone(&transcriber), config::cache::ttl());

    let served = axum::serve(listener, router(transcriber))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("Shutdown signal received, stopping API server");
        })
        .await;

    cleanup.abort();
    served?;
    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn transcribe_handler(
    State(state): State<ApiState>,
    body: Result<Json<TranscribeRequest>, JsonRejection>,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let request = body
        .map(|Json(r)| r)
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e.body_text())))?;

    let url = request
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::new(StatusCode::BAD_REQUEST, "Field 'url' is required."))?;

    if validate_video_url(&url).is_err() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Invalid URL. Use a YouTube link."));
    }

    let lang = request.lang.as_deref().map(str::trim).filter(|l| !l.is_empty());
    log::info!("POST /transcribe {} (lang: {:?})", url, lang);

    let result = state.transcriber.download_subtitles(&url, lang).await?;
    let word_count = result.word_count();
    let char_count = result.char_count();
    let Some(transcription) = result.text else {
        return Err(ApiError::no_captions());
    };

    Ok(Json(TranscribeResponse {
        title: result.title,
        transcription,
        word_count,
        char_count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use legendacore::core::retry::RateLimitRetry;
    use legendacore::download::{ExtractError, ExtractOptions, MetadataExtractor, PayloadFetcher, TrackDescriptor};
    use legendacore::storage::{ManualClock, TranscriptCache};
    use legendacore::VideoMetadata;
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use std::collections::HashMap;
    use tower::ServiceExt;

    struct StubExtractor(Result<VideoMetadata, ExtractError>);

    #[async_trait]
    impl MetadataExtractor for StubExtractor {
        fn name(&self) -> &str {
            "stub"
        }

        async fn extract(&self, _url: &str, _options: &ExtractOptions) -> Result<VideoMetadata, ExtractError> {
            self.0.clone()
        }
    }

    struct StubFetcher(Result<String, String>);

    #[async_trait]
    impl PayloadFetcher for StubFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, AppError> {
            self.0.clone().map_err(AppError::FetchFailed)
        }
    }

    fn app(extracted: Result<VideoMetadata, ExtractError>, fetched: Result<String, String>) -> Router {
        let transcriber = Transcriber::new(Arc::new(StubExtractor(extracted)), Arc::new(StubFetcher(fetched)))
            .with_retry(RateLimitRetry::new().max_retries(1).no_escalation());
        router(Arc::new(transcriber))
    }

    fn video_with_pt_track() -> VideoMetadata {
        let mut auto = HashMap::new();
        auto.insert("pt".to_string(), vec![TrackDescriptor::new("vtt", "https://c/pt.vtt")]);
        VideoMetadata {
            title: "Receita de bolo".to_string(),
            detected_language: Some("pt".to_string()),
            manual_tracks: HashMap::new(),
            auto_tracks: auto,
        }
    }

    async fn post_json(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post("/transcribe")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Ok(video_with_pt_track()), Ok(String::new()))
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_transcribe_success() {
        let vtt = "WEBVTT\n\n00:00.000 --> 00:02.000\n[Música] misture a farinha\n00:02.000 --> 00:04.000\ncom os ovos\n";
        let (status, body) = post_json(
            app(Ok(video_with_pt_track()), Ok(vtt.to_string())),
            r#"{"url": "https://www.youtube.com/watch?v=abc123"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "title": "Receita de bolo",
                "transcription": "misture a farinha com os ovos",
                "word_count": 6,
                "char_count": 29
            })
        );
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_request() {
        let (status, body) = post_json(app(Ok(video_with_pt_track()), Ok(String::new())), r#"{"lang": "pt"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Field 'url' is required.");
    }

    #[tokio::test]
    async fn test_non_json_body_is_bad_request() {
        let (status, body) = post_json(app(Ok(video_with_pt_track()), Ok(String::new())), "url=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }

    #[tokio::test]
    async fn test_non_youtube_url_is_bad_request() {
        let (status, body) = post_json(
            app(Ok(video_with_pt_track()), Ok(String::new())),
            r#"{"url": "https://vimeo.com/123"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid URL. Use a YouTube link.");
    }

    #[tokio::test]
    async fn test_no_captions_is_not_found() {
        let (status, body) = post_json(
            app(Ok(video_with_pt_track()), Ok(String::new())),
            r#"{"url": "https://youtu.be/abc123", "lang": "ja"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No captions available for this video.");
    }

    #[tokio::test]
    async fn test_unavailable_video_is_not_found() {
        let (status, body) = post_json(
            app(Err(ExtractError::VideoUnavailable("Private video".into())), Ok(String::new())),
            r#"{"url": "https://youtu.be/abc123"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Video unavailable or private.");
    }

    #[tokio::test]
    async fn test_extractor_rejected_url_is_bad_request() {
        let (status, _) = post_json(
            app(Err(ExtractError::InvalidUrl("Unsupported URL".into())), Ok(String::new())),
            r#"{"url": "https://www.youtube.com/not-a-video"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_cleanup_runs_on_interval() {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(TranscriptCache::with_clock(Duration::from_secs(60), clock.clone()));
        let vtt = "WEBVTT\n\n00:00.000 --> 00:02.000\nolá\n";
        let transcriber = Arc::new(
            Transcriber::new(
                Arc::new(StubExtractor(Ok(video_with_pt_track()))),
                Arc::new(StubFetcher(Ok(vtt.to_string()))),
            )
            .with_retry(RateLimitRetry::new().max_retries(1).no_escalation())
            .with_cache(cache.clone()),
        );
        transcriber.download_subtitles("https://youtu.be/abc123", None).await.unwrap();
        assert_eq!(cache.stats().await.size, 1);

        let handle = spawn_cache_cleanup(Arc::clone(&transcriber), Duration::from_secs(60));
        clock.advance(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(cache.stats().await.size, 0);
        handle.abort();
    }

    #[tokio::test]
    async fn test_other_failures_are_internal_errors() {
        let (status, body) = post_json(
            app(Ok(video_with_pt_track()), Err("HTTP request failed with status: 503".into())),
            r#"{"url": "https://youtu.be/abc123"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("503"));

        let (status, _) = post_json(
            app(Err(ExtractError::RateLimited("429".into())), Ok(String::new())),
            r#"{"url": "https://youtu.be/abc123"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

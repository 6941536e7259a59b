use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;

use legendacore::core::validation::validate_video_url;
use legendacore::core::{config, init_logger, log_cookies_configuration};
use legendacore::{save_transcription, Transcriber};

mod api;
mod cli;

use cli::{Cli, Commands};

/// Entry point: CLI transcription or the REST API.
///
/// # Errors
/// Returns an error if initialization fails, or if `transcribe` finds no
/// captions or hits any pipeline error (the process then exits with status 1).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;
    log_cookies_configuration();

    match cli.command {
        Some(Commands::Transcribe { url, lang, output_dir }) => run_transcribe(url, lang, output_dir).await,
        Some(Commands::Serve { host, port }) => run_serve(host, port).await,
        None => run_serve(None, None).await,
    }
}

async fn run_transcribe(url: String, lang: Option<String>, output_dir: PathBuf) -> Result<()> {
    validate_video_url(&url)?;

    let transcriber = Transcriber::with_defaults()?;
    let result = transcriber.download_subtitles(url.trim(), lang.as_deref()).await?;

    let Some(text) = result.text.as_deref() else {
        return Err(anyhow!("No captions available for '{}'", result.title));
    };

    let path = save_transcription(text, &result.title, &output_dir)?;
    log::info!(
        "Saved {} words ({} chars) to {}",
        result.word_count(),
        result.char_count(),
        path.display()
    );
    println!("{}", path.display());
    Ok(())
}

async fn run_serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config::web::HOST.clone());
    let port = port.unwrap_or(*config::web::PORT);

    let transcriber = Arc::new(Transcriber::with_defaults()?);
    api::start_api_server(&host, port, transcriber).await
}

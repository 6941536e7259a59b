use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "legenda")]
#[command(author, version, about = "Download YouTube captions as clean plain text", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the captions of one video and save them as <title>.txt
    Transcribe {
        /// YouTube video URL (quote URLs containing &)
        url: String,

        /// Caption language (e.g. pt, en, es). Detected from the video if omitted
        #[arg(short, long)]
        lang: Option<String>,

        /// Directory for the .txt file
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Run the REST API (default when no command is given)
    Serve {
        /// Bind address [env: WEB_HOST, default 0.0.0.0]
        #[arg(long)]
        host: Option<String>,

        /// Port [env: WEB_PORT, default 5000]
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

//! Clippers - Video Downloader Server
//!
//! Serves a small HTTP API that lists the formats of a video URL, downloads a
//! chosen format with yt-dlp and exposes the result under `/downloads`.
//! `clippers fetch` drives the same API from the terminal.

use anyhow::Result;
use clap::{Parser, Subcommand};
use clippers::backend;
use clippers::client::{self, ApiClient, FetchOptions};
use clippers::utils::AppSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clippers", version, about = "Video downloader server and client")]
struct Args {
    /// JSON settings file
    #[arg(long, global = true, env = "CLIPPERS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Directory downloaded files are written to and served from
        #[arg(long)]
        downloads_dir: Option<PathBuf>,
    },

    /// Analyze a URL against a running server and optionally download it
    Fetch {
        /// Video page URL
        url: String,

        /// Format id to download instead of the first listed one
        #[arg(long)]
        format: Option<String>,

        /// Download the selected format
        #[arg(long)]
        download: bool,

        /// Copy the finished file to this file or directory (default: Downloads)
        #[arg(long, num_args = 0..=1, requires = "download")]
        save_to: Option<Option<PathBuf>>,

        /// Delete the server-side files afterwards
        #[arg(long, requires = "download")]
        cleanup: bool,

        /// Server base URL
        #[arg(long)]
        api_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clippers=info,tower_http=info")),
        )
        .init();

    let mut settings = AppSettings::load(args.config.as_deref())?;

    match args.command.unwrap_or(Command::Serve {
        port: None,
        downloads_dir: None,
    }) {
        Command::Serve {
            port,
            downloads_dir,
        } => {
            if let Some(port) = port {
                settings.port = port;
            }
            if let Some(dir) = downloads_dir {
                settings.downloads_dir = dir;
            }
            backend::serve(settings).await
        }
        Command::Fetch {
            url,
            format,
            download,
            save_to,
            cleanup,
            api_url,
        } => {
            let base_url = api_url.unwrap_or(settings.api_base_url);
            let api = ApiClient::new(&base_url)?;
            let options = FetchOptions {
                format,
                download,
                save_to,
                cleanup,
            };
            client::fetch(&api, &url, &options).await?;
            Ok(())
        }
    }
}

//! Cadence Player - main entry point
//!
//! Playback orchestrator for voice sessions: owns queues, loop and
//! autoplay modes, and the genre taste model. Exposes a REST API for
//! the chat gateway and listens for playback signals from the media
//! node.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cadence_player::api::{self, ApiContext};
use cadence_player::media::HttpMediaService;
use cadence_player::{Config, PlaybackEngine};

/// Command-line arguments for cadence-player
#[derive(Parser, Debug)]
#[command(name = "cadence-player")]
#[command(about = "Voice channel playback orchestrator for Cadence")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5720", env = "CADENCE_PORT")]
    port: u16,

    /// Path to the TOML configuration file
    #[arg(short, long, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the media node
    #[arg(
        short,
        long,
        default_value = "http://127.0.0.1:2333",
        env = "CADENCE_MEDIA_URL"
    )]
    media_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_player=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting Cadence Player on port {}", args.port);
    info!("Media node: {}", args.media_url);

    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    let media = Arc::new(
        HttpMediaService::new(&args.media_url).context("Failed to create media node client")?,
    );
    let engine = PlaybackEngine::new(config, media);
    info!("Playback engine initialized");

    let app = api::create_router(ApiContext { engine });

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}

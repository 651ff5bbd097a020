//! Demo binary: a small HTTP server that shuts down gracefully.

use std::path::PathBuf;
use std::time::Duration;

use axum::{routing::get, Router};
use clap::Parser;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use graceful_server::{config, GracefulServer};

#[derive(Parser)]
#[command(name = "graceful-server")]
#[command(about = "HTTP server with graceful shutdown", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address override (host:port).
    #[arg(short, long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "graceful_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let cfg = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::ServerConfig::default(),
    };
    let addr = args.addr.unwrap_or_else(|| cfg.bind_address.clone());

    tracing::info!(
        bind_address = %addr,
        shutdown_timeout_secs = cfg.shutdown_timeout_secs,
        "configuration loaded"
    );

    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http());

    let mut server = GracefulServer::new(app);
    server.set_shutdown_timeout(cfg.shutdown_timeout());
    server.listen_and_serve(&addr).await?;

    tracing::info!("shutdown complete");
    Ok(())
}

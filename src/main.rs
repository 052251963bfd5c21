//! Portfolio development server.
//!
//! Serves the site root with single-page-app fallback so that reloading an
//! in-app route returns the page shell and the navigator renders the route.
//!
//! ```text
//! GET /about          → index.html (navigator loads pages/about.html)
//! GET /pages/a.html   → the fragment itself
//! GET /assets/x.png   → the asset, or 404 (never the shell)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use portfolio_nav::config::{load_config, NavConfig};
use portfolio_nav::observability::{logging, metrics};
use portfolio_nav::DevServer;

#[derive(Parser)]
#[command(name = "portfolio-nav")]
#[command(about = "Development server for the portfolio site", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the directory served as the site root.
    #[arg(short, long)]
    root: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => NavConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(root) = args.root {
        config.server.root = root;
    }

    logging::init(&config.observability);
    tracing::info!("portfolio-nav v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        root = %config.server.root,
        request_timeout_secs = config.server.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = DevServer::new(config.server);
    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

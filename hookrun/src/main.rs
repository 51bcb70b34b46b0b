//! hookrun server binary.
//!
//! Loads the YAML config, sets up structured logging, builds the route table
//! and serves the webhook endpoints until SIGINT/SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hookrun::web::build_router;
use hookrun::{AppState, Config, LogConfig, RouteTable, ShellRunner};

#[derive(Parser)]
#[command(name = "hookrun", about = "HMAC-authenticated webhook deploy receiver")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config before logging: the log format itself is configured
    let config = Config::load(&args.config).context("Failed to load configuration")?;

    init_logging(&config.log);

    info!(
        listen_addr = %config.listen_addr,
        routes = config.routes.len(),
        log_level = %config.log.level,
        "config_loaded"
    );

    let routes = Arc::new(RouteTable::from_config(&config.routes));
    for path in routes.paths() {
        info!(path = %path, "route_registered");
    }

    let listen_addr = config.listen_addr.clone();
    let state = AppState::new(config, routes, Arc::new(ShellRunner));

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {listen_addr}"))?;

    info!(address = %listen_addr, "server_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("server_shutdown_complete");

    Ok(())
}

/// Initialize structured logging per the config: RUST_LOG wins when set,
/// otherwise the configured level; JSON or human-readable format.
fn init_logging(log: &LogConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let registry = tracing_subscriber::registry().with(filter);
    if log.json {
        registry
            .with(fmt::layer().json().flatten_event(true))
            .init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("server_shutting_down");
}

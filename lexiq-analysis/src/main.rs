//! LexiQ analysis service - Main entry point
//!
//! Serves the text analysis API over HTTP, WebSocket and SSE.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lexiq_analysis::{build_router, AppState, ServiceSettings};
use lexiq_common::config::{ensure_directory_exists, load_toml_config, resolve_root_folder};
use lexiq_common::lifecycle::{start_all, stop_all};

/// Command-line arguments for lexiq-analysis
#[derive(Parser, Debug)]
#[command(name = "lexiq-analysis")]
#[command(about = "Text analysis microservice for LexiQ")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "LEXIQ_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config file)
    #[arg(long, env = "LEXIQ_HOST")]
    host: Option<String>,

    /// Path to TOML config file
    #[arg(short, long, env = "LEXIQ_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder for service data
    #[arg(short, long, env = "LEXIQ_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Run every request as the anonymous user
    #[arg(long)]
    no_auth: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config =
        load_toml_config(args.config.as_deref()).context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting LexiQ analysis service (lexiq-analysis) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    ensure_directory_exists(&root_folder).context("Failed to create root folder")?;
    info!("Root folder: {}", root_folder.display());

    let mut settings = ServiceSettings::from_toml(&toml_config, root_folder)
        .with_overrides(args.host, args.port);
    if args.no_auth {
        settings = settings.with_auth(false);
    }
    if !settings.auth_enabled {
        info!("Authentication disabled, requests run as the anonymous user");
    }

    let bind_address = settings.bind_address();
    let state = AppState::new(settings);
    let services = state.services();
    start_all(&services)
        .await
        .context("Failed to start services")?;

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;
    info!("Listening on http://{}", bind_address);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    stop_all(&services).await;
    served.context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}

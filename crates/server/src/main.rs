//! silt server binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use silt_core::config::AppConfig;
use silt_server::{AppState, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// silt - a minimal live-audio distribution server
#[derive(Parser, Debug)]
#[command(name = "siltd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "SILT_CONFIG", default_value = "config/server.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("silt v{}", env!("CARGO_PKG_VERSION"));

    // Config file is optional; SILT_ env vars can provide or override
    // everything (e.g. SILT_SERVER__BIND=0.0.0.0:8080).
    let mut figment = Figment::new();
    if std::path::Path::new(&args.config).exists() {
        tracing::info!(config_path = %args.config, "loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("no config file found at {}", args.config);
    }
    figment = figment.merge(Env::prefixed("SILT_").split("__"));

    let config: AppConfig = figment
        .extract()
        .context("failed to load configuration")?;

    let metadata = silt_metadata::from_config(&config.metadata)
        .await
        .context("failed to open metadata store")?;
    let storage = silt_storage::from_config(&config.storage)
        .await
        .context("failed to open blob storage")?;

    let bind = config.server.bind.clone();
    let state = AppState::new(config, metadata, storage)?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(bind = %bind, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown handler");
        return;
    }
    tracing::info!("shutting down");
}

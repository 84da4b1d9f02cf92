//! phishing-detector: train at startup, then serve `POST /predict`.

use anyhow::Context;
use phishing_detector::config::CONFIG_ENV_VAR;
use phishing_detector::{AppConfig, pipeline, server};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phishing_detector=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting phishing-detector v{}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
        .map(PathBuf::from);

    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            AppConfig::from_file(&path)?
        }
        None => {
            info!("No config file specified, using defaults");
            AppConfig::default()
        }
    };

    let context = pipeline::prepare_context(&config).with_context(|| {
        format!(
            "failed to prepare model (mode: {:?}, dataset: {:?}, artifacts: {:?})",
            config.training.mode, config.dataset.path, config.artifacts.dir
        )
    })?;

    server::serve(&config.server.listen_addr, Arc::new(context)).await?;

    Ok(())
}

// Copyright (C) 2026 Parity Technologies (UK) Ltd.
// SPDX-License-Identifier: GPL-3.0-or-later

use config::{Args, ConfigError, RosettaConfig};
use substrate_rosetta::{
    app,
    logging::{self, LoggingConfig, LoggingError},
    state::{AppState, StateError},
};
use thiserror::Error;

#[cfg(not(target_os = "windows"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let args = Args::parse_args();
    if dotenv::from_filename(&args.env_file).is_err() {
        eprintln!("No env file at {}, using the environment only", args.env_file);
    }

    let mut config = RosettaConfig::from_env()?;
    config.gateway.offline |= args.offline;

    let _log_guard = logging::init_with_config(LoggingConfig::from(&config.log))?;

    let addr = config.server.listen_addr()?;
    let offline = config.gateway.offline;
    let networks: Vec<String> = config
        .networks
        .iter()
        .map(|n| format!("{}/{}", n.blockchain, n.network))
        .collect();

    let state = AppState::new(config)?;
    let app = app::create_app(state);

    tracing::info!("Starting server on {}", addr);
    tracing::info!(offline, networks = ?networks, "Serving networks");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

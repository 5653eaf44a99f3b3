//! Server Initialization
//!
//! Loads configuration, installs logging, bootstraps the application context,
//! starts the background workers and serves HTTP until Rocket shuts down
//! (Ctrl+C or SIGTERM). Workers are then cancelled and given the configured
//! grace period to finish their in-flight items.

use crate::routes::build_rocket;
use gatehouse_infrastructure::config::{AppConfig, ConfigLoader};
use gatehouse_infrastructure::{WorkerSupervisor, init_app, logging};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Run the Gatehouse server
///
/// `no_workers` keeps the invalidation listener and consumer from starting
/// regardless of `server.workers`.
pub async fn run(
    config_path: Option<&Path>,
    no_workers: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, source) = load_config(config_path)?;
    logging::init_logging(config.logging.clone())?;
    logging::log_config_loaded(source.as_deref());

    info!(
        host = %config.server.host,
        port = config.server.port,
        store = %config.store.provider,
        origin = %config.origin.provider,
        "Starting Gatehouse"
    );

    let host = config.server.host.clone();
    let port = config.server.port;
    let run_workers = config.server.workers && !no_workers;
    let shutdown_timeout = config.server.shutdown_timeout();

    let ctx = Arc::new(init_app(config).await?);
    let supervisor = WorkerSupervisor::new();
    if run_workers {
        let started = ctx.start_workers(&supervisor)?;
        info!(workers = started, "Background workers started");
    } else {
        info!("Background workers disabled");
    }

    let figment = rocket::Config::figment()
        .merge(("address", host))
        .merge(("port", port))
        .merge(("log_level", rocket::config::LogLevel::Critical));
    let served = build_rocket(ctx).configure(figment).launch().await;

    if let Err(e) = supervisor.shutdown(shutdown_timeout).await {
        error!(error = %e, "Background workers did not stop cleanly");
    }
    served?;
    info!("Gatehouse stopped");
    Ok(())
}

/// Load configuration from optional path, with the file it came from
fn load_config(
    config_path: Option<&Path>,
) -> Result<(AppConfig, Option<PathBuf>), Box<dyn std::error::Error>> {
    let loader = match config_path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    Ok(loader.load_with_source()?)
}

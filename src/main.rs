//! Timesheet approval server.
//!
//! Environment:
//! - `TIMESHEET_CONFIG_DIR`: EA configuration directory (default `./config/ea_schedule1`)
//! - `TIMESHEET_BIND_ADDR`: listen address (default `0.0.0.0:8080`)
//! - `TIMESHEET_ASSIGNMENTS`: optional YAML list of lecturer-course assignments
//! - `RUST_LOG`: log filter (default `info`)

use std::env;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use timesheet_engine::api::{AppState, create_router};
use timesheet_engine::clock::SystemClock;
use timesheet_engine::config::ConfigLoader;
use timesheet_engine::store::{InMemoryCourseDirectory, InMemoryStore};
use timesheet_engine::workflow::WorkflowService;

const DEFAULT_CONFIG_DIR: &str = "./config/ea_schedule1";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config_dir = env::var("TIMESHEET_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let bind_addr = env::var("TIMESHEET_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir)?;
    info!(
        config_dir = %config_dir,
        agreement = %config.agreement().code,
        rate_versions = ?config.rate_versions(),
        "Loaded EA configuration"
    );

    let directory = match env::var("TIMESHEET_ASSIGNMENTS") {
        Ok(path) => {
            let directory = InMemoryCourseDirectory::from_yaml_file(&path)?;
            info!(path = %path, assignments = directory.len(), "Loaded course assignments");
            directory
        }
        Err(_) => {
            warn!("TIMESHEET_ASSIGNMENTS not set; lecturers have no course assignments");
            InMemoryCourseDirectory::default()
        }
    };

    let service = WorkflowService::new(
        Arc::new(config),
        Arc::new(InMemoryStore::new()),
        Arc::new(directory),
        Arc::new(SystemClock),
    );
    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(bind_addr = %bind_addr, "timesheet-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("timesheet-server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
    }
}

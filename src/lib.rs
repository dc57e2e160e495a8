pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod schedule;
pub mod specialists;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use config::{DatabaseLocation, ServerConfig};
use db::{SpecialistStore, SqliteStore, StoreError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Store(#[from] StoreError),

    #[error("Server error: {0}")]
    Server(String),
}

/// Open the configured store.
pub fn open_store(location: &DatabaseLocation) -> Result<Arc<dyn SpecialistStore>, StoreError> {
    let store = match location {
        DatabaseLocation::Memory => SqliteStore::open_in_memory()?,
        DatabaseLocation::File(path) => SqliteStore::open(path)?,
    };
    Ok(Arc::new(store))
}

/// Initialize tracing, load configuration, and serve until Ctrl-C.
pub async fn run() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = ServerConfig::from_env()?;
    match &config.database {
        DatabaseLocation::Memory => tracing::warn!("Using in-memory database; data is not persisted"),
        DatabaseLocation::File(path) => tracing::info!(path = %path.display(), "Opening database"),
    }
    let store = open_store(&config.database)?;

    let mut server = api::start_server_on(api::api_router(store), config.bind_addr)
        .await
        .map_err(AppError::Server)?;
    tracing::info!(addr = %server.addr, "Listening");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
    }
    server.shutdown();
    server.stopped().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_store_in_memory() {
        let store = open_store(&DatabaseLocation::Memory).unwrap();
        assert!(store.list(true, &models::ListOrder::default()).unwrap().is_empty());
    }

    #[test]
    fn open_store_file_persists_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let location = DatabaseLocation::File(tmp.path().join("roster.db"));

        let store = open_store(&location).unwrap();
        let created = store
            .insert(models::NewSpecialist {
                full_name: "Ana Torres".into(),
                specialty: "Cardiología".into(),
                registration_number: "CMP-1".into(),
                weekly_schedule: models::WeeklySchedule::new(),
            })
            .unwrap();
        drop(store);

        let reopened = open_store(&location).unwrap();
        assert_eq!(reopened.get(&created.id).unwrap(), Some(created));
    }
}

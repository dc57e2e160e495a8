use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "especialistas";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_ADDR: &str = "ESPECIALISTAS_ADDR";
pub const ENV_DB: &str = "ESPECIALISTAS_DB";

pub const DEFAULT_ADDR: &str = "127.0.0.1:3333";
const DB_FILE_NAME: &str = "especialistas.db";
const MEMORY_DB: &str = ":memory:";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid ESPECIALISTAS_ADDR value {value:?}: {source}")]
    InvalidAddress {
        value: String,
        source: std::net::AddrParseError,
    },

    #[error("Cannot determine a data directory; set ESPECIALISTAS_DB")]
    NoDataDir,
}

/// Where the specialist records live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database: DatabaseLocation,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = get(ENV_ADDR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let bind_addr: SocketAddr = addr
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidAddress {
                value: addr.clone(),
                source,
            })?;

        let database = match get(ENV_DB) {
            Some(db) if db.trim() == MEMORY_DB => DatabaseLocation::Memory,
            Some(db) => DatabaseLocation::File(PathBuf::from(db.trim())),
            None => DatabaseLocation::File(default_db_path().ok_or(ConfigError::NoDataDir)?),
        };

        Ok(Self {
            bind_addr,
            database,
        })
    }
}

/// Platform data directory for the service, e.g. `~/.local/share/especialistas`.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_NAME))
}

/// Default SQLite file location
pub fn default_db_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join(DB_FILE_NAME))
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "especialistas=info,tower_http=info"
}

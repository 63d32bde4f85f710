//! Node configuration.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults ([`NodeConfig::default`])
//! 2. an optional config file (format chosen by extension: toml, yaml, json)
//! 3. `BUGBOARD_*` environment variables, e.g. `BUGBOARD_API_ADDR`
//! 4. command-line flags, applied by the binary

use bugboard_tracker::{BugStore, MemoryStore, SqliteStore};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::observability::LogFormat;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "BUGBOARD";

/// Configuration for a bugboard node.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    /// HTTP listen address.
    pub api_addr: SocketAddr,
    /// SQLite database file. When unset, records live in memory only.
    pub database_path: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database_path: None,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl NodeConfig {
    /// Loads configuration from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration with an explicit environment source.
    pub fn load_with_env(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder
            .add_source(env.try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Opens the store this configuration selects.
    pub fn open_store(&self) -> bugboard_tracker::Result<Arc<dyn BugStore>> {
        match &self.database_path {
            Some(path) => Ok(Arc::new(SqliteStore::open(path)?)),
            None => Ok(Arc::new(MemoryStore::new())),
        }
    }
}

//! Configuration management for rosterbox
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use rosterbox::config::Config;
//!
//! let config = Config::load_with(None).expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `ROSTERBOX__<section>__<key>`
//!
//! Examples:
//! - `ROSTERBOX__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `ROSTERBOX__DATABASE__BACKEND=memory`
//! - `ROSTERBOX__PAGINATION__MAX_SIZE=500`
//!
//! `MONGO_URI` and `PORT` are also honoured for compatibility with existing deployments.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/rosterbox.toml`.
//! This can be overridden using the `ROSTERBOX_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

pub use models::{
    AllocatorKind, Config, DatabaseConfig, PaginationConfig, RegistrationConfig, ServerConfig,
    StoreBackend,
};
pub use validation::ValidationError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`ROSTERBOX__*`, `MONGO_URI`, `PORT`)
    /// 2. TOML file (`path`, else `ROSTERBOX_CONFIG`, else `config/rosterbox.toml`)
    /// 3. Default values
    pub fn load_with(path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

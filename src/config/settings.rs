//! Application settings.
//!
//! A small TOML file configures the database location and the blob storage
//! root; both fall back to environment variables and then to local defaults,
//! so a bare checkout runs without any configuration at all.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{fs, path::Path};

fn default_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/habitude.sqlite?mode=rwc".to_string())
}

fn default_blob_root() -> String {
    std::env::var("BLOB_ROOT").unwrap_or_else(|_| "data/blobs".to_string())
}

/// Top-level application configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    /// `SQLite` connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Directory the filesystem blob store writes under
    #[serde(default = "default_blob_root")]
    pub blob_root: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            blob_root: default_blob_root(),
        }
    }
}

/// Loads configuration from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse TOML from config file {path_ref:?}: {e}"),
    })
}

/// Loads configuration from the given file when it exists, otherwise from
/// environment variables and defaults.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    if path.as_ref().exists() {
        load_config(path)
    } else {
        Ok(AppConfig::default())
    }
}

//! Configuration management
//!
//! Stores the API host and key in a TOML file so the CLI does not need them on
//! every invocation. The library itself never reads this file: `SctClient`
//! takes its host and key as arguments.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "SCT_CONFIG_DIR";

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "sct";

/// Persisted client settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the API, e.g. `https://swift-cloud-tools.example.com`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Config {
    /// Pick the host and key to use, preferring explicit values over the file
    ///
    /// Values are returned verbatim; a trailing slash on the host is kept.
    pub fn resolve(
        &self,
        host: Option<String>,
        api_key: Option<String>,
    ) -> Result<(String, String)> {
        let host = host
            .or_else(|| self.host.clone())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::config("no API host configured"))?;
        let api_key = api_key
            .or_else(|| self.api_key.clone())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::config("no API key configured"))?;
        Ok((host, api_key))
    }
}

/// Loads and saves [`Config`] at a fixed path
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Use `$SCT_CONFIG_DIR/config.toml`, or the platform config directory
    pub fn new() -> Result<Self> {
        let dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::config("could not determine config directory"))?
                .join(APP_DIR_NAME),
        };
        Ok(Self::with_path(dir.join(CONFIG_FILE_NAME)))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config, returning the default when the file does not exist
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("{}: {e}", self.path.display())))
    }

    /// Write the config, creating parent directories as needed
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| Error::config(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), "Config saved");
        Ok(())
    }
}

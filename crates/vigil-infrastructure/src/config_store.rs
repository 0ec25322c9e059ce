//! Persistent transport config storage.
//!
//! A single named slot holding the `ApiConfig`, stored as TOML in the
//! vigil config directory. Read at menu load, written on session start.

use std::fs;
use std::path::PathBuf;

use vigil_core::config::ApiConfig;
use vigil_core::error::{Result, VigilError};

use crate::paths::VigilPaths;

/// Loads and saves the single persisted `ApiConfig` slot.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// A store over the default platform config directory.
    pub fn new() -> Result<Self> {
        let dir = VigilPaths::config_dir()
            .map_err(|e| VigilError::config(format!("failed to resolve config dir: {}", e)))?;
        Ok(Self { dir })
    }

    /// A store over an explicit directory. Used by tests.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.join("config.toml")
    }

    /// Loads the persisted config.
    ///
    /// A missing or empty file is not an error: it reports `Ok(None)` so
    /// the menu can ask for credentials. A file that exists but cannot
    /// be read or parsed is an error.
    pub fn load(&self) -> Result<Option<ApiConfig>> {
        let path = self.config_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            VigilError::config(format!("failed to read config file at {:?}: {}", path, e))
        })?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let config: ApiConfig = toml::from_str(&content).map_err(|e| {
            VigilError::config(format!("failed to parse TOML from {:?}: {}", path, e))
        })?;
        Ok(Some(config))
    }

    /// Saves the config, creating the directory if needed.
    pub fn save(&self, config: &ApiConfig) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| {
                VigilError::config(format!(
                    "failed to create config directory at {:?}: {}",
                    self.dir, e
                ))
            })?;
        }

        let toml_string = toml::to_string_pretty(config)?;
        let path = self.config_path();
        fs::write(&path, toml_string).map_err(|e| {
            VigilError::config(format!("failed to write config file at {:?}: {}", path, e))
        })?;

        tracing::debug!(path = ?path, "transport config saved");
        Ok(())
    }
}

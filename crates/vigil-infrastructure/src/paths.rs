//! Unified path management for vigil configuration files.
//!
//! All vigil configuration lives under a single directory resolved from
//! the platform config dir. This keeps every storage consumer consistent
//! across Linux, macOS, and Windows.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/vigil/             # Config directory
//! └── config.toml              # Transport credentials and mode
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for vigil.
pub struct VigilPaths;

impl VigilPaths {
    /// Returns the vigil configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to the config directory (e.g. `~/.config/vigil/`)
    /// - `Err(PathError::HomeDirNotFound)`: Could not determine the directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("vigil"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path of the persisted transport config file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

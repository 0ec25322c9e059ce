//! Infrastructure layer for the Vigil narrative engine.
//!
//! Persistent config storage under the platform config directory, path
//! management, and the static lore library.

pub mod config_store;
pub mod lore;
pub mod paths;

pub use config_store::ConfigStore;
pub use lore::{LoreCategory, LoreEntry, LoreStore};
pub use paths::{PathError, VigilPaths};

//! Configuration for AvlStore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for an AvlStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the store file (header + slot array in a single flat file)
    pub file_path: PathBuf,

    /// When true, any existing file is discarded and a fresh empty store
    /// is created; when false, an existing file is reopened as-is
    pub truncate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("./avlstore.dat"),
            truncate: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the store file path
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.file_path = path.into();
        self
    }

    /// Discard any existing file and start from an empty store
    pub fn truncate(mut self, truncate: bool) -> Self {
        self.config.truncate = truncate;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

//! Configuration for TransitDB
//!
//! Centralized configuration with sensible defaults. Operations take
//! explicit file paths; `Config` supplies the default layout the CLI
//! uses when a path is not given.

use std::path::PathBuf;

/// Main configuration for a TransitDB data set
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for all data files (stores and indexes)
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── lines.bin           (line record store)
    ///     ├── lines.sorted.bin    (compacted line store)
    ///     ├── lines.idx           (line ordered index)
    ///     ├── vehicles.bin        (vehicle record store)
    ///     └── vehicles.sorted.bin (compacted vehicle store)
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./transitdb_data"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn line_store(&self) -> PathBuf {
        self.data_dir.join("lines.bin")
    }

    pub fn sorted_line_store(&self) -> PathBuf {
        self.data_dir.join("lines.sorted.bin")
    }

    pub fn line_index(&self) -> PathBuf {
        self.data_dir.join("lines.idx")
    }

    pub fn vehicle_store(&self) -> PathBuf {
        self.data_dir.join("vehicles.bin")
    }

    pub fn sorted_vehicle_store(&self) -> PathBuf {
        self.data_dir.join("vehicles.sorted.bin")
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

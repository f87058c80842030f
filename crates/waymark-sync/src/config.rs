//! Sync runtime configuration.

use std::path::{Path, PathBuf};

/// Configuration for import/export operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory the interchange file lives in, relative to the host's data
    /// path.
    pub interchange_dir: PathBuf,
    /// Interchange file name.
    pub interchange_file: String,
}

impl SyncConfig {
    /// Full path of the interchange file.
    pub fn interchange_path(&self) -> PathBuf {
        self.interchange_dir.join(&self.interchange_file)
    }

    /// Replace the interchange directory, e.g. to root it under the host's
    /// data path.
    pub fn with_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.interchange_dir = dir.as_ref().to_path_buf();
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interchange_dir: PathBuf::from("ModData/Waymark"),
            interchange_file: "waypoints.json".to_string(),
        }
    }
}

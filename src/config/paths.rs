//! Path management for backup-rotation
//!
//! ## Config File Resolution Order
//!
//! 1. Explicit path from the command line (or `BACKUP_ROTATION_CONFIG`)
//! 2. `config.json` in the directory containing the executable

use std::path::{Path, PathBuf};

use crate::error::{RotationError, RotationResult};

/// File name looked up beside the executable when no config path is given
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Resolves the configuration file location
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    config_file: PathBuf,
}

impl ConfigPaths {
    /// Create a new ConfigPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no explicit path is given and the executable's
    /// directory cannot be determined.
    pub fn new(explicit: Option<PathBuf>) -> RotationResult<Self> {
        let config_file = match explicit {
            Some(path) => path,
            None => resolve_default_path()?,
        };

        Ok(Self { config_file })
    }

    /// Get the path to the configuration file
    pub fn config_file(&self) -> &Path {
        &self.config_file
    }
}

/// `config.json` next to the running executable
fn resolve_default_path() -> RotationResult<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| RotationError::Config(format!("Could not locate executable: {}", e)))?;
    let dir = exe
        .parent()
        .ok_or_else(|| RotationError::Config("Executable has no parent directory".into()))?;
    Ok(dir.join(DEFAULT_CONFIG_FILE))
}

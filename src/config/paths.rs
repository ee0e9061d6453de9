//! Path management for Pennywise
//!
//! ## Path Resolution Order
//!
//! 1. `PENNYWISE_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/pennywise` on Linux, `%APPDATA%\pennywise\config` on Windows)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::PennywiseError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "PENNYWISE_DATA_DIR";

/// Manages all paths used by Pennywise
#[derive(Debug, Clone)]
pub struct PennywisePaths {
    /// Base directory for all Pennywise data
    base_dir: PathBuf,
}

impl PennywisePaths {
    /// Resolve the base directory from the environment or the platform
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, PennywiseError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "pennywise")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    PennywiseError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create PennywisePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the SQLite database
    pub fn database_file(&self) -> PathBuf {
        self.base_dir.join("pennywise.sqlite3")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the default directory for exported backups
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    /// Ensure the base and export directories exist
    pub fn ensure_directories(&self) -> Result<(), PennywiseError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PennywiseError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.export_dir()).map_err(|e| {
            PennywiseError::Io(format!("Failed to create export directory: {}", e))
        })?;

        Ok(())
    }

    /// Check if Pennywise has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

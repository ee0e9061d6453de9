//! User settings for Pennywise
//!
//! Manages export and import preferences and whether operations are audited.

use serde::{Deserialize, Serialize};

use super::paths::PennywisePaths;
use crate::error::PennywiseError;
use crate::export::DateFormat;
use crate::import::ImportMode;

/// User settings for Pennywise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Date column format for CSV exports
    #[serde(default)]
    pub date_format: DateFormat,

    /// Mode used when `import` is run without `--mode`
    #[serde(default)]
    pub default_import_mode: ImportMode,

    /// Write JSON backups indented
    #[serde(default = "default_true")]
    pub pretty_json: bool,

    /// Append every export and import to the audit log
    #[serde(default = "default_true")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            date_format: DateFormat::default(),
            default_import_mode: ImportMode::default(),
            pretty_json: true,
            audit_enabled: true,
        }
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &PennywisePaths) -> Result<Self, PennywiseError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                PennywiseError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PennywiseError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PennywisePaths) -> Result<(), PennywiseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PennywiseError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PennywiseError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.date_format, DateFormat::MonthDayYear);
        assert_eq!(settings.default_import_mode, ImportMode::Replace);
        assert!(settings.audit_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PennywisePaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            date_format: DateFormat::Iso,
            default_import_mode: ImportMode::Merge,
            ..Default::default()
        };
        settings.save(&paths).unwrap();

        assert!(paths.is_initialized());
        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"date_format": "DD/MM/YYYY"}"#).unwrap();
        assert_eq!(settings.date_format, DateFormat::DayMonthYear);
        assert_eq!(settings.schema_version, 1);
        assert!(settings.pretty_json);
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PennywisePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, PennywiseError::Config(_)));
    }
}

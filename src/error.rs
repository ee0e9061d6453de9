//! Custom error types for Pennywise
//!
//! This module defines the error hierarchy for the backup engine using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for Pennywise operations
#[derive(Error, Debug)]
pub enum PennywiseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for payloads and records
    #[error("Validation error: {0}")]
    Validation(String),

    /// An encrypted payload arrived without a password
    #[error("A password is required to process an encrypted backup")]
    PasswordRequired,

    /// Authentication failed while opening an encrypted envelope
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Errors while sealing data
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// The payload declares a format version this build cannot read
    #[error("Unsupported backup version: {0}")]
    UnsupportedVersion(i64),

    /// Export errors (ExportFailed)
    #[error("Export error: {0}")]
    Export(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// An atomic sequence was aborted and rolled back
    #[error("Transaction failed: {0}")]
    Transaction(String),
}

impl PennywiseError {
    /// Create a "duplicate" error for a record of the given entity type
    pub fn duplicate(entity_type: &'static str, identifier: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            identifier: identifier.into(),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::PasswordRequired | Self::UnsupportedVersion(_)
        )
    }

    /// Check if this error came out of the envelope path
    pub fn is_decryption(&self) -> bool {
        matches!(self, Self::Decryption(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for PennywiseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PennywiseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for PennywiseError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Result type alias for Pennywise operations
pub type PennywiseResult<T> = Result<T, PennywiseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PennywiseError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_duplicate_error() {
        let err = PennywiseError::duplicate("Account", "acc-1");
        assert_eq!(err.to_string(), "Account already exists: acc-1");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_classification() {
        assert!(PennywiseError::PasswordRequired.is_validation());
        assert!(PennywiseError::UnsupportedVersion(7).is_validation());
        assert!(!PennywiseError::Decryption("bad tag".into()).is_validation());
        assert!(PennywiseError::Decryption("bad tag".into()).is_decryption());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PennywiseError = io_err.into();
        assert!(matches!(err, PennywiseError::Io(_)));
    }
}

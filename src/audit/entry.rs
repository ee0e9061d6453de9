//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::import::{ImportResult, ValidationReport};
use crate::models::ExportScope;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// A backup was written
    Export,
    /// A backup was loaded into the store
    Import,
    /// A backup was checked without writing
    Validate,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Export => write!(f, "EXPORT"),
            Operation::Import => write!(f, "IMPORT"),
            Operation::Validate => write!(f, "VALIDATE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// Scope of an export or mode of an import (e.g. `all`, `merge`)
    pub detail: String,

    /// Whether the operation succeeded
    pub success: bool,

    /// Records exported, imported, or found valid
    pub records: usize,

    /// Number of error entries reported
    #[serde(default)]
    pub error_count: usize,

    /// Whether the backup was encrypted
    #[serde(default)]
    pub encrypted: bool,

    /// File the backup was read from or written to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, detail: impl Into<String>, target: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            detail: detail.into(),
            success: true,
            records: 0,
            error_count: 0,
            encrypted: false,
            target,
        }
    }

    /// Entry for a finished export
    pub fn export(
        scope: ExportScope,
        format: &str,
        records: usize,
        encrypted: bool,
        target: Option<String>,
    ) -> Self {
        Self {
            records,
            encrypted,
            ..Self::new(Operation::Export, format!("{} ({})", scope, format), target)
        }
    }

    /// Entry for an import attempt
    pub fn import(result: &ImportResult, encrypted: bool, target: Option<String>) -> Self {
        Self {
            success: result.success,
            records: result.total_added(),
            error_count: result.errors.len(),
            encrypted,
            ..Self::new(Operation::Import, result.mode.to_string(), target)
        }
    }

    /// Entry for a dry-run validation
    pub fn validate(report: &ValidationReport, target: Option<String>) -> Self {
        Self {
            success: report.valid,
            records: report.total_records(),
            error_count: report.errors.len(),
            encrypted: report.encrypted,
            ..Self::new(Operation::Validate, report.mode.to_string(), target)
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} records",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.detail,
            self.records
        );

        if self.encrypted {
            output.push_str(" (encrypted)");
        }
        if !self.success {
            output.push_str(&format!(" FAILED, {} error(s)", self.error_count));
        }
        if let Some(target) = &self.target {
            output.push_str(&format!("\n  File: {}", target));
        }

        output
    }
}

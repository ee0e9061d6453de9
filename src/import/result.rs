//! Import outcome types
//!
//! An `ImportResult` is built up while a strategy runs and handed back
//! once. Per-record problems land in `errors` next to the counts of what
//! did succeed; the presentation layer decides how to weigh the two.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PennywiseError;
use crate::models::EntityKind;

use super::ImportMode;

/// Classification of an import error entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or invalid field, or unsupported version
    Validation,
    /// Encrypted payload without a password
    PasswordRequired,
    /// Wrong password or corrupted envelope
    Decryption,
    /// Record points at a parent that does not exist
    Referential,
    /// Store failure while writing one record
    Persistence,
    /// The atomic unit failed and was rolled back
    Transaction,
}

impl ErrorKind {
    /// Errors that mean the request itself was unusable
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation | Self::PasswordRequired | Self::Decryption
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Validation => "validation",
            Self::PasswordRequired => "password_required",
            Self::Decryption => "decryption",
            Self::Referential => "referential",
            Self::Persistence => "persistence",
            Self::Transaction => "transaction",
        };
        write!(f, "{}", label)
    }
}

/// One error entry of an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordError {
    pub kind: ErrorKind,
    /// Entity or collection the error concerns (`payload` for the whole body)
    pub entity: String,
    /// Offending record id, empty when not tied to one record
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl RecordError {
    fn new(kind: ErrorKind, entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind,
            entity: entity.into(),
            id: id.into(),
            field: None,
            message: String::new(),
        }
    }

    fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// A validation finding
    pub fn validation(
        entity: impl Into<String>,
        id: impl Into<String>,
        field: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        let err = Self::new(ErrorKind::Validation, entity, id).with_message(message);
        match field {
            Some(field) => err.with_field(field),
            None => err,
        }
    }

    /// An encrypted payload arrived without a password
    pub fn password_required() -> Self {
        Self::new(ErrorKind::PasswordRequired, "payload", "")
            .with_message(PennywiseError::PasswordRequired.to_string())
    }

    /// A record whose parent is missing
    pub fn referential(
        kind: EntityKind,
        id: &str,
        field: &'static str,
        target: EntityKind,
        target_id: &str,
    ) -> Self {
        Self::new(ErrorKind::Referential, kind.as_str(), id)
            .with_field(field)
            .with_message(format!(
                "{} references missing {} {}",
                field,
                target.as_str(),
                target_id
            ))
    }

    /// A store failure while writing one record
    pub fn persistence(kind: EntityKind, id: &str, err: &PennywiseError) -> Self {
        Self::new(ErrorKind::Persistence, kind.as_str(), id).with_message(err.to_string())
    }

    /// A rolled-back atomic unit
    pub fn transaction(mode: ImportMode, err: &PennywiseError) -> Self {
        Self::new(ErrorKind::Transaction, "import", "")
            .with_message(format!("{} import rolled back: {}", mode, err))
    }

    /// Classify an engine error raised before any write
    pub fn from_error(err: &PennywiseError) -> Self {
        let kind = match err {
            PennywiseError::PasswordRequired => ErrorKind::PasswordRequired,
            PennywiseError::Decryption(_) => ErrorKind::Decryption,
            _ => ErrorKind::Validation,
        };
        Self::new(kind, "payload", "").with_message(err.to_string())
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.entity)?;
        if !self.id.is_empty() {
            write!(f, " {}", self.id)?;
        }
        if let Some(field) = &self.field {
            write!(f, " ({})", field)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// What happened to one record that did not error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Added,
    Skipped,
}

/// Added and skipped counts for one entity kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub added: usize,
    pub skipped: usize,
}

/// Per-kind counts, keyed by entity label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportSummary {
    counts: BTreeMap<EntityKind, EntityCounts>,
}

impl Default for ImportSummary {
    fn default() -> Self {
        Self {
            counts: EntityKind::ALL
                .into_iter()
                .map(|kind| (kind, EntityCounts::default()))
                .collect(),
        }
    }
}

impl ImportSummary {
    /// Counts for one kind
    pub fn get(&self, kind: EntityKind) -> EntityCounts {
        self.counts.get(&kind).copied().unwrap_or_default()
    }

    /// Tally one record outcome
    pub fn record(&mut self, kind: EntityKind, outcome: RecordOutcome) {
        let counts = self.counts.entry(kind).or_default();
        match outcome {
            RecordOutcome::Added => counts.added += 1,
            RecordOutcome::Skipped => counts.skipped += 1,
        }
    }

    /// Sum of `added` over every kind
    pub fn total_added(&self) -> usize {
        self.counts.values().map(|c| c.added).sum()
    }

    /// Sum of `skipped` over every kind
    pub fn total_skipped(&self) -> usize {
        self.counts.values().map(|c| c.skipped).sum()
    }

    /// Iterate counts in import order
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, EntityCounts)> + '_ {
        EntityKind::MERGE_ORDER
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
    }
}

/// Result of one import call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    pub mode: ImportMode,
    pub summary: ImportSummary,
    pub errors: Vec<RecordError>,
}

impl ImportResult {
    /// A completed import; successful only when no errors were recorded
    pub fn completed(mode: ImportMode, summary: ImportSummary, errors: Vec<RecordError>) -> Self {
        Self {
            success: errors.is_empty(),
            mode,
            summary,
            errors,
        }
    }

    /// An import that wrote nothing
    pub fn rejected(mode: ImportMode, errors: Vec<RecordError>) -> Self {
        Self {
            success: false,
            mode,
            summary: ImportSummary::default(),
            errors,
        }
    }

    /// Sum of every `added` count
    pub fn total_added(&self) -> usize {
        self.summary.total_added()
    }

    /// Some records were committed even though errors were recorded
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty() && self.total_added() > 0
    }

    /// Nothing was written because the request itself was unusable
    /// (validation, missing password or failed decryption)
    pub fn is_client_error(&self) -> bool {
        !self.success
            && self.total_added() == 0
            && !self.errors.is_empty()
            && self.errors.iter().all(|e| e.kind.is_client_error())
    }
}

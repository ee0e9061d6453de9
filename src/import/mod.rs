//! Import engine for Pennywise
//!
//! Drives one import from request to result:
//!
//! ```text
//! Received -> decrypt (if enveloped) -> validated -> Replace | Merge -> Completed
//! ```
//!
//! Nothing is written until the payload has cleared every validation pass.
//! Replace is all-or-nothing. Merge commits what it can and lists the rest.

pub mod merge;
pub mod replace;
pub mod request;
pub mod result;
pub mod validate;

pub use merge::merge_all;
pub use replace::replace_all;
pub use request::{ImportMode, ImportOptions, ImportPayload, ImportRequest};
pub use result::{
    EntityCounts, ErrorKind, ImportResult, ImportSummary, RecordError, RecordOutcome,
};
pub use validate::{validate_snapshot, ValidatedSnapshot};

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::crypto::{self, Password};
use crate::models::{EntityKind, ExportScope};
use crate::storage::EntityStore;

/// Outcome of a dry-run validation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub encrypted: bool,
    pub mode: ImportMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ExportScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    /// Records per collection, only for a valid payload
    pub counts: BTreeMap<EntityKind, usize>,
    pub errors: Vec<RecordError>,
}

impl ValidationReport {
    /// Total number of records the payload would import
    pub fn total_records(&self) -> usize {
        self.counts.values().sum()
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        match (self.valid, self.version) {
            (true, Some(version)) => format!(
                "Valid backup (v{}, scope {}): {} records",
                version,
                self.scope.unwrap_or_default(),
                self.total_records()
            ),
            _ => format!("Invalid backup: {} error(s)", self.errors.len()),
        }
    }
}

/// Service for importing backups into a store
pub struct ImportService<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> ImportService<'a, S> {
    /// Create a new import service over `store`
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Decrypt if needed and run every validation pass
    fn prepare(
        payload: &ImportPayload,
        password: Option<&Password>,
    ) -> Result<ValidatedSnapshot, Vec<RecordError>> {
        let plain: Cow<'_, Value> = match payload {
            ImportPayload::Plain(value) => Cow::Borrowed(value),
            ImportPayload::Encrypted(envelope) => {
                let password = password
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| vec![RecordError::password_required()])?;
                let value = crypto::decrypt_value(envelope, password)
                    .map_err(|e| vec![RecordError::from_error(&e)])?;
                Cow::Owned(value)
            }
        };

        validate_snapshot(&plain)
    }

    /// Import a resolved request
    pub fn import(&self, request: ImportRequest) -> ImportResult {
        let ImportRequest {
            payload,
            options,
            legacy,
        } = request;
        let mode = options.mode;

        tracing::info!(
            mode = %mode,
            encrypted = payload.is_encrypted(),
            legacy,
            "import started"
        );

        let validated = match Self::prepare(&payload, options.password.as_ref()) {
            Ok(validated) => validated,
            Err(errors) => {
                tracing::warn!(mode = %mode, errors = errors.len(), "import rejected");
                return ImportResult::rejected(mode, errors);
            }
        };

        let result = match mode {
            ImportMode::Replace => match replace_all(self.store, &validated.data) {
                Ok(summary) => ImportResult::completed(mode, summary, Vec::new()),
                Err(err) => {
                    tracing::error!(error = %err, "replace rolled back");
                    ImportResult::rejected(mode, vec![RecordError::transaction(mode, &err)])
                }
            },
            ImportMode::Merge => match merge_all(self.store, &validated.data) {
                Ok((summary, errors)) => ImportResult::completed(mode, summary, errors),
                Err(err) => {
                    tracing::error!(error = %err, "merge rolled back");
                    ImportResult::rejected(mode, vec![RecordError::transaction(mode, &err)])
                }
            },
        };

        tracing::info!(
            mode = %mode,
            success = result.success,
            added = result.total_added(),
            skipped = result.summary.total_skipped(),
            errors = result.errors.len(),
            "import finished"
        );
        result
    }

    /// Resolve a raw request body and import it
    pub fn import_value(&self, body: Value) -> ImportResult {
        match ImportRequest::from_value(body) {
            Ok(request) => self.import(request),
            Err(err) => {
                ImportResult::rejected(ImportMode::default(), vec![RecordError::from_error(&err)])
            }
        }
    }

    /// Check a request without writing anything
    pub fn validate(&self, request: &ImportRequest) -> ValidationReport {
        let mut report = ValidationReport {
            valid: false,
            encrypted: request.payload.is_encrypted(),
            mode: request.mode(),
            version: None,
            scope: None,
            exported_at: None,
            counts: BTreeMap::new(),
            errors: Vec::new(),
        };

        match Self::prepare(&request.payload, request.options.password.as_ref()) {
            Ok(validated) => {
                report.valid = true;
                report.version = Some(validated.version);
                report.scope = Some(validated.scope);
                report.exported_at = validated.exported_at;
                report.counts = EntityKind::ALL
                    .into_iter()
                    .map(|kind| (kind, validated.data.len(kind)))
                    .collect();
            }
            Err(errors) => report.errors = errors,
        }

        tracing::debug!(valid = report.valid, errors = report.errors.len(), "payload validated");
        report
    }
}

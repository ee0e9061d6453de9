//! Export engine for Pennywise
//!
//! Produces backups of the dataset in three shapes:
//! - JSON: a versioned `Snapshot`, full or scoped
//! - Encrypted JSON: the snapshot sealed in an `EncryptedEnvelope`
//! - CSV: the transaction set only, for spreadsheets
//!
//! Every call reads the store afresh; nothing is cached between exports.

pub mod csv;
pub mod json;

pub use self::csv::{render_transactions_csv, DateFormat, CSV_HEADER};
pub use self::json::build_snapshot;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::crypto::{self, EncryptedEnvelope, Password};
use crate::error::{PennywiseError, PennywiseResult};
use crate::models::{DateRange, EntityKind, ExportScope, Record, Snapshot};
use crate::storage::EntityStore;

/// Output format of an export request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// Options of one export request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub scope: ExportScope,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default)]
    pub password: Option<Password>,
    /// Raw format name; unrecognized names fall back to `MM/DD/YYYY`
    #[serde(default)]
    pub date_format: Option<String>,
}

impl ExportOptions {
    fn resolved_date_format(&self) -> DateFormat {
        self.date_format
            .as_deref()
            .map(DateFormat::parse)
            .unwrap_or_default()
    }
}

/// The artifact produced by an export request
#[derive(Debug, Clone)]
pub enum ExportOutput {
    Json(Snapshot),
    Encrypted(EncryptedEnvelope),
    Csv(String),
}

impl ExportOutput {
    /// File extension for downloads
    pub fn file_extension(&self) -> &'static str {
        match self {
            Self::Json(_) | Self::Encrypted(_) => "json",
            Self::Csv(_) => "csv",
        }
    }

    /// MIME type for downloads
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json(_) | Self::Encrypted(_) => "application/json",
            Self::Csv(_) => "text/csv",
        }
    }

    /// Check whether the artifact is encrypted
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }

    /// Serialize the artifact for writing to disk
    pub fn to_bytes(&self, pretty: bool) -> PennywiseResult<Vec<u8>> {
        let bytes = match (self, pretty) {
            (Self::Json(snapshot), true) => serde_json::to_vec_pretty(snapshot)?,
            (Self::Json(snapshot), false) => serde_json::to_vec(snapshot)?,
            (Self::Encrypted(envelope), true) => serde_json::to_vec_pretty(envelope)?,
            (Self::Encrypted(envelope), false) => serde_json::to_vec(envelope)?,
            (Self::Csv(text), _) => text.clone().into_bytes(),
        };
        Ok(bytes)
    }

    /// Suggested download name, e.g. `pennywise-backup-2024-07-04.json`
    pub fn suggested_filename(&self, date: NaiveDate) -> String {
        format!(
            "pennywise-backup-{}.{}",
            date.format("%Y-%m-%d"),
            self.file_extension()
        )
    }
}

/// Service for exporting the dataset
pub struct ExportService<'a, S: EntityStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: EntityStore + ?Sized> ExportService<'a, S> {
    /// Create a new export service over `store`
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Snapshot of all eight collections
    pub fn export_full(&self) -> PennywiseResult<Snapshot> {
        self.export_scoped(ExportScope::All, None)
    }

    /// Snapshot of the collections `scope` includes, transactions limited
    /// to `date_range` when one is given
    pub fn export_scoped(
        &self,
        scope: ExportScope,
        date_range: Option<&DateRange>,
    ) -> PennywiseResult<Snapshot> {
        let snapshot = build_snapshot(self.store, scope, date_range)?;
        tracing::info!(
            scope = %scope,
            records = snapshot.data.total_records(),
            "snapshot exported"
        );
        Ok(snapshot)
    }

    /// CSV document of the transaction set
    pub fn export_csv(
        &self,
        date_range: Option<&DateRange>,
        date_format: DateFormat,
    ) -> PennywiseResult<String> {
        let mut tables = json::read_tables(
            self.store,
            &[EntityKind::Transaction, EntityKind::Account, EntityKind::Category],
            date_range,
        )?;
        let mut take = |kind: EntityKind| tables.remove(&kind).unwrap_or_default();

        let transactions = typed(take(EntityKind::Transaction), |r| match r {
            Record::Transaction(t) => Some(t),
            _ => None,
        });
        let accounts = typed(take(EntityKind::Account), |r| match r {
            Record::Account(a) => Some(a),
            _ => None,
        });
        let categories = typed(take(EntityKind::Category), |r| match r {
            Record::Category(c) => Some(c),
            _ => None,
        });

        let csv = render_transactions_csv(&transactions, &accounts, &categories, date_format)?;
        tracing::info!(rows = transactions.len(), format = %date_format, "CSV exported");
        Ok(csv)
    }

    /// Seal a snapshot under `password`
    pub fn encrypt(
        &self,
        snapshot: &Snapshot,
        password: &Password,
    ) -> PennywiseResult<EncryptedEnvelope> {
        crypto::encrypt(snapshot, password)
    }

    /// Open an envelope produced by `encrypt`
    pub fn decrypt(
        &self,
        envelope: &EncryptedEnvelope,
        password: &Password,
    ) -> PennywiseResult<Snapshot> {
        crypto::decrypt(envelope, password)
    }

    /// Run a full export request
    pub fn export(&self, options: &ExportOptions) -> PennywiseResult<ExportOutput> {
        match options.format {
            ExportFormat::Csv => {
                if options.encrypted {
                    return Err(PennywiseError::Validation(
                        "Encryption is only available for JSON exports".to_string(),
                    ));
                }
                let csv = self.export_csv(
                    options.date_range.as_ref(),
                    options.resolved_date_format(),
                )?;
                Ok(ExportOutput::Csv(csv))
            }
            ExportFormat::Json => {
                // Fail before reading anything if the envelope cannot be sealed
                let password = match (options.encrypted, &options.password) {
                    (true, Some(p)) if !p.is_empty() => Some(p),
                    (true, _) => return Err(PennywiseError::PasswordRequired),
                    (false, _) => None,
                };

                let snapshot = self.export_scoped(options.scope, options.date_range.as_ref())?;
                match password {
                    Some(password) => {
                        Ok(ExportOutput::Encrypted(self.encrypt(&snapshot, password)?))
                    }
                    None => Ok(ExportOutput::Json(snapshot)),
                }
            }
        }
    }
}

fn typed<T>(records: Vec<Record>, pick: impl Fn(Record) -> Option<T>) -> Vec<T> {
    records.into_iter().filter_map(pick).collect()
}

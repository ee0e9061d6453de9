//! Payload validation
//!
//! Runs before anything is written. Three passes, each reporting every
//! finding rather than the first:
//! 1. structure: supported `version`, a `data` object, all eight
//!    collections present as arrays
//! 2. required fields on transactions, accounts and categories
//! 3. typed decode of every record
//!
//! A pass only runs when the previous one came back clean.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::PennywiseError;
use crate::models::{
    Account, Bill, Budget, Category, EntityKind, ExportScope, Goal, GoalContribution, Record,
    RecurringPattern, SnapshotData, Transaction, SUPPORTED_VERSIONS,
};

use super::RecordError;

/// A payload that passed every validation pass
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSnapshot {
    pub version: u32,
    pub exported_at: Option<DateTime<Utc>>,
    pub scope: ExportScope,
    pub data: SnapshotData,
}

/// Validate an untyped snapshot, returning typed data or every finding of
/// the first failing pass
pub fn validate_snapshot(value: &Value) -> Result<ValidatedSnapshot, Vec<RecordError>> {
    let (version, data) = check_structure(value)?;
    check_required_fields(data)?;
    let data = decode_records(data)?;

    Ok(ValidatedSnapshot {
        version,
        exported_at: value
            .get("exportedAt")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        scope: value
            .get("scope")
            .and_then(Value::as_str)
            .and_then(ExportScope::parse)
            .unwrap_or_default(),
        data,
    })
}

fn payload_error(field: &str, message: impl Into<String>) -> RecordError {
    RecordError::validation("payload", "", Some(field), message)
}

fn check_version(value: &Value) -> Result<u32, RecordError> {
    let raw = value
        .get("version")
        .ok_or_else(|| payload_error("version", "Missing required field: version"))?;
    let version = raw
        .as_i64()
        .ok_or_else(|| payload_error("version", "version must be an integer"))?;

    u32::try_from(version)
        .ok()
        .filter(|v| SUPPORTED_VERSIONS.contains(v))
        .ok_or_else(|| {
            payload_error(
                "version",
                PennywiseError::UnsupportedVersion(version).to_string(),
            )
        })
}

/// Pass 1
fn check_structure(value: &Value) -> Result<(u32, &Map<String, Value>), Vec<RecordError>> {
    let mut errors = Vec::new();

    let version = check_version(value).map_err(|e| errors.push(e)).ok();

    let data = match value.get("data") {
        Some(Value::Object(data)) => Some(data),
        Some(_) => {
            errors.push(payload_error("data", "data must be an object"));
            None
        }
        None => {
            errors.push(payload_error("data", "Missing required field: data"));
            None
        }
    };

    if let Some(data) = data {
        for kind in EntityKind::ALL {
            let collection = kind.collection();
            match data.get(collection) {
                Some(Value::Array(_)) => {}
                Some(_) => errors.push(RecordError::validation(
                    collection,
                    "",
                    Some(collection),
                    format!("{} must be an array", collection),
                )),
                None => errors.push(RecordError::validation(
                    collection,
                    "",
                    Some(collection),
                    format!("Missing required collection: {}", collection),
                )),
            }
        }
    }

    match (version, data) {
        (Some(version), Some(data)) if errors.is_empty() => Ok((version, data)),
        _ => Err(errors),
    }
}

fn collection<'a>(data: &'a Map<String, Value>, kind: EntityKind) -> &'a [Value] {
    data.get(kind.collection())
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Label a record by its id, or by its position when it has none
fn record_label(record: &Value, index: usize) -> String {
    match record.get("id") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => format!("#{}", index),
    }
}

const REQUIRED_FIELDS: [(EntityKind, &[&str]); 3] = [
    (EntityKind::Transaction, &["id", "account_id", "amount"]),
    (EntityKind::Account, &["id", "name"]),
    (EntityKind::Category, &["id", "name"]),
];

/// Pass 2
fn check_required_fields(data: &Map<String, Value>) -> Result<(), Vec<RecordError>> {
    let mut errors = Vec::new();

    for (kind, fields) in REQUIRED_FIELDS {
        for (index, record) in collection(data, kind).iter().enumerate() {
            let label = record_label(record, index);

            if !record.is_object() {
                errors.push(RecordError::validation(
                    kind.as_str(),
                    label,
                    None,
                    "Record must be an object",
                ));
                continue;
            }

            for field in fields {
                let present = match (record.get(*field), *field) {
                    (Some(v), "amount") => v.is_number(),
                    (Some(Value::String(s)), _) => !s.is_empty(),
                    _ => false,
                };
                if !present {
                    let message = if *field == "amount" {
                        "amount must be a number".to_string()
                    } else {
                        format!("Missing required field: {}", field)
                    };
                    errors.push(RecordError::validation(
                        kind.as_str(),
                        label.clone(),
                        Some(*field),
                        message,
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn decode_into<T>(
    kind: EntityKind,
    items: &[Value],
    data: &mut SnapshotData,
    errors: &mut Vec<RecordError>,
) where
    T: DeserializeOwned + Into<Record>,
{
    for (index, item) in items.iter().enumerate() {
        match T::deserialize(item) {
            Ok(record) => data.push(record.into()),
            Err(e) => errors.push(RecordError::validation(
                kind.as_str(),
                record_label(item, index),
                None,
                format!("Invalid {}: {}", kind.display_name().to_lowercase(), e),
            )),
        }
    }
}

/// Pass 3
fn decode_records(raw: &Map<String, Value>) -> Result<SnapshotData, Vec<RecordError>> {
    let mut data = SnapshotData::default();
    let mut errors = Vec::new();

    for kind in EntityKind::ALL {
        let items = collection(raw, kind);
        let (data, errors) = (&mut data, &mut errors);
        match kind {
            EntityKind::Account => decode_into::<Account>(kind, items, data, errors),
            EntityKind::Category => decode_into::<Category>(kind, items, data, errors),
            EntityKind::Transaction => decode_into::<Transaction>(kind, items, data, errors),
            EntityKind::Bill => decode_into::<Bill>(kind, items, data, errors),
            EntityKind::Budget => decode_into::<Budget>(kind, items, data, errors),
            EntityKind::Goal => decode_into::<Goal>(kind, items, data, errors),
            EntityKind::GoalContribution => {
                decode_into::<GoalContribution>(kind, items, data, errors)
            }
            EntityKind::RecurringPattern => {
                decode_into::<RecurringPattern>(kind, items, data, errors)
            }
        }
    }

    if errors.is_empty() {
        Ok(data)
    } else {
        Err(errors)
    }
}

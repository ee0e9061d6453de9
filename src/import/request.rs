//! Import request parsing
//!
//! Two request shapes are accepted. The wrapped form is
//! `{ "data": <snapshot or envelope>, "options": { "mode", "password" } }`.
//! Older clients post the bare snapshot (or envelope) on its own; that form
//! always means a replace. The shape is resolved here, once, so nothing
//! downstream has to look at raw request JSON again.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::crypto::{EncryptedEnvelope, Password};
use crate::error::{PennywiseError, PennywiseResult};

/// Import consistency policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Atomically overwrite the whole dataset
    #[default]
    Replace,
    /// Add records whose ids are not present yet
    Merge,
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace => write!(f, "replace"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Options of the wrapped request form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportOptions {
    #[serde(default)]
    pub mode: ImportMode,
    #[serde(default)]
    pub password: Option<Password>,
}

/// The backup carried by a request
#[derive(Debug, Clone)]
pub enum ImportPayload {
    /// A plain snapshot, still untyped until validation
    Plain(Value),
    /// An encrypted envelope
    Encrypted(EncryptedEnvelope),
}

impl ImportPayload {
    /// Classify a payload; anything with `"encrypted": true` is an envelope
    pub fn from_value(value: Value) -> PennywiseResult<Self> {
        if value.get("encrypted") == Some(&Value::Bool(true)) {
            let envelope = serde_json::from_value(value).map_err(|e| {
                PennywiseError::Decryption(format!("Malformed encrypted envelope: {}", e))
            })?;
            return Ok(Self::Encrypted(envelope));
        }
        Ok(Self::Plain(value))
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }
}

/// A resolved import request
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub payload: ImportPayload,
    pub options: ImportOptions,
    /// Whether the request arrived in the bare legacy shape
    pub legacy: bool,
}

impl ImportRequest {
    /// Build a request around a payload with explicit options
    pub fn new(payload: ImportPayload, options: ImportOptions) -> Self {
        Self {
            payload,
            options,
            legacy: false,
        }
    }

    /// Resolve a request body
    pub fn from_value(value: Value) -> PennywiseResult<Self> {
        let Value::Object(mut body) = value else {
            return Err(PennywiseError::Validation(
                "Import payload must be a JSON object".to_string(),
            ));
        };

        if let Some(options) = body.remove("options") {
            let options: ImportOptions = serde_json::from_value(options).map_err(|e| {
                PennywiseError::Validation(format!("Invalid import options: {}", e))
            })?;
            let data = body.remove("data").ok_or_else(|| {
                PennywiseError::Validation("Missing required field: data".to_string())
            })?;
            return Ok(Self::new(ImportPayload::from_value(data)?, options));
        }

        let is_bare = body.contains_key("version") || body.contains_key("encrypted");
        let wraps_backup = !is_bare
            && body.len() == 1
            && body
                .get("data")
                .map_or(false, |data| data.get("version").is_some() || data.get("encrypted").is_some());

        if wraps_backup {
            if let Some(data) = body.remove("data") {
                return Ok(Self::new(
                    ImportPayload::from_value(data)?,
                    ImportOptions::default(),
                ));
            }
        }

        // Bare snapshot; structural validation reports whatever is missing
        Ok(Self {
            payload: ImportPayload::from_value(Value::Object(body))?,
            options: ImportOptions::default(),
            legacy: true,
        })
    }

    /// Parse and resolve a request body from raw JSON
    pub fn from_slice(bytes: &[u8]) -> PennywiseResult<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| {
            PennywiseError::Validation(format!("Payload is not valid JSON: {}", e))
        })?;
        Self::from_value(value)
    }

    /// Override the import mode
    pub fn with_mode(mut self, mode: ImportMode) -> Self {
        self.options.mode = mode;
        self
    }

    /// Supply the password for an encrypted payload
    pub fn with_password(mut self, password: Password) -> Self {
        self.options.password = Some(password);
        self
    }

    pub fn mode(&self) -> ImportMode {
        self.options.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wrapped_request() {
        let request = ImportRequest::from_value(json!({
            "data": {"version": 1, "data": {}},
            "options": {"mode": "merge", "password": "pw"}
        }))
        .unwrap();

        assert_eq!(request.mode(), ImportMode::Merge);
        assert_eq!(request.options.password.as_deref(), Some("pw"));
        assert!(!request.legacy);
        assert!(matches!(request.payload, ImportPayload::Plain(ref v) if v["version"] == 1));
    }

    #[test]
    fn test_bare_snapshot_defaults_to_replace() {
        let request = ImportRequest::from_value(json!({
            "version": 1,
            "exportedAt": "2024-01-01T00:00:00Z",
            "data": {"accounts": []}
        }))
        .unwrap();

        assert!(request.legacy);
        assert_eq!(request.mode(), ImportMode::Replace);
        let ImportPayload::Plain(value) = request.payload else {
            panic!("expected a plain payload");
        };
        assert_eq!(value["version"], 1);
        assert!(value["data"]["accounts"].is_array());
    }

    #[test]
    fn test_data_only_wrapper() {
        let request = ImportRequest::from_value(json!({
            "data": {"version": 1, "data": {"accounts": []}}
        }))
        .unwrap();
        assert!(!request.legacy);
        assert_eq!(request.mode(), ImportMode::Replace);
    }

    #[test]
    fn test_encrypted_payload_is_envelope() {
        let request = ImportRequest::from_value(json!({
            "version": 1,
            "encrypted": true,
            "algorithm": "aes-256-gcm",
            "salt": "AAAA",
            "iv": "AAAA",
            "authTag": "AAAA",
            "data": "AAAA"
        }))
        .unwrap();
        assert!(request.payload.is_encrypted());
    }

    #[test]
    fn test_malformed_envelope_is_decryption_error() {
        let err = ImportRequest::from_value(json!({"encrypted": true, "data": "x"})).unwrap_err();
        assert!(err.is_decryption());
    }

    #[test]
    fn test_rejects_non_objects_and_bad_options() {
        assert!(ImportRequest::from_value(json!([1, 2])).unwrap_err().is_validation());
        assert!(ImportRequest::from_value(json!({"data": {}, "options": {"mode": "upsert"}}))
            .unwrap_err()
            .is_validation());
        assert!(ImportRequest::from_value(json!({"options": {}}))
            .unwrap_err()
            .is_validation());
        assert!(ImportRequest::from_slice(b"{not json").unwrap_err().is_validation());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(ImportMode::Merge.to_string(), "merge");
        assert_eq!(ImportMode::Replace.to_string(), "replace");
    }
}

//! AES-256-GCM backup envelope
//!
//! A snapshot is serialized to JSON, sealed with AES-256-GCM under a key
//! derived from the password, and wrapped in an `EncryptedEnvelope` whose
//! binary fields are base64. Salt and IV are fresh on every call. The
//! authentication tag is checked before any plaintext is used, so a wrong
//! password and a corrupted payload both surface as `Decryption`.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{AeadInPlace, KeyInit, OsRng};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce, Tag};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{PennywiseError, PennywiseResult};
use crate::models::Snapshot;

use super::key_derivation::SALT_SIZE;
use super::{derive_key, DerivedKey, KeyDerivationParams, Password};

/// AES-256-GCM with a 128-bit IV
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Algorithm label written into every envelope
pub const ALGORITHM: &str = "aes-256-gcm";

/// Envelope format version
pub const ENVELOPE_VERSION: u32 = 1;

const IV_SIZE: usize = 16;
const TAG_SIZE: usize = 16;

/// Encrypted wrapper around a serialized snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    pub version: u32,
    /// Always `true`; this is how an envelope is told apart from a snapshot
    pub encrypted: bool,
    pub algorithm: String,
    /// PBKDF2 salt (base64)
    pub salt: String,
    /// AES-GCM IV (base64)
    pub iv: String,
    /// AES-GCM authentication tag (base64)
    pub auth_tag: String,
    /// Ciphertext (base64)
    pub data: String,
}

impl EncryptedEnvelope {
    fn decode_field(&self, name: &str, value: &str, expected: Option<usize>) -> PennywiseResult<Vec<u8>> {
        let bytes = STANDARD
            .decode(value)
            .map_err(|e| PennywiseError::Decryption(format!("Invalid {} encoding: {}", name, e)))?;

        if let Some(len) = expected {
            if bytes.len() != len {
                return Err(PennywiseError::Decryption(format!(
                    "Invalid {} size: expected {}, got {}",
                    name,
                    len,
                    bytes.len()
                )));
            }
        }
        Ok(bytes)
    }

    fn check_header(&self) -> PennywiseResult<()> {
        if self.version != ENVELOPE_VERSION {
            return Err(PennywiseError::Decryption(format!(
                "Unsupported envelope version: {}",
                self.version
            )));
        }
        if !self.encrypted {
            return Err(PennywiseError::Decryption(
                "Envelope is not marked as encrypted".to_string(),
            ));
        }
        if !self.algorithm.eq_ignore_ascii_case(ALGORITHM) {
            return Err(PennywiseError::Decryption(format!(
                "Unsupported algorithm: {}",
                self.algorithm
            )));
        }
        Ok(())
    }
}

fn cipher(key: &DerivedKey) -> PennywiseResult<Aes256Gcm16> {
    Aes256Gcm16::new_from_slice(key.as_bytes())
        .map_err(|e| PennywiseError::Encryption(format!("Failed to create cipher: {}", e)))
}

/// Seal arbitrary bytes under `password`
pub fn seal(plaintext: &[u8], password: &Password) -> PennywiseResult<EncryptedEnvelope> {
    let params = KeyDerivationParams::new();
    let key = derive_key(password, &params);
    let cipher = cipher(&key)?;

    let mut iv = [0u8; IV_SIZE];
    OsRng.fill_bytes(&mut iv);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::<U16>::from_slice(&iv), b"", &mut buffer)
        .map_err(|e| PennywiseError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok(EncryptedEnvelope {
        version: ENVELOPE_VERSION,
        encrypted: true,
        algorithm: ALGORITHM.to_string(),
        salt: STANDARD.encode(params.salt),
        iv: STANDARD.encode(iv),
        auth_tag: STANDARD.encode(tag),
        data: STANDARD.encode(&buffer),
    })
}

/// Authenticate and decrypt an envelope's bytes
pub fn open(envelope: &EncryptedEnvelope, password: &Password) -> PennywiseResult<Zeroizing<Vec<u8>>> {
    envelope.check_header()?;

    let salt_bytes = envelope.decode_field("salt", &envelope.salt, Some(SALT_SIZE))?;
    let iv = envelope.decode_field("iv", &envelope.iv, Some(IV_SIZE))?;
    let tag = envelope.decode_field("authTag", &envelope.auth_tag, Some(TAG_SIZE))?;
    let mut buffer = Zeroizing::new(envelope.decode_field("data", &envelope.data, None)?);

    let mut salt = [0u8; SALT_SIZE];
    salt.copy_from_slice(&salt_bytes);
    let key = derive_key(password, &KeyDerivationParams::with_salt(salt));

    cipher(&key)?
        .decrypt_in_place_detached(
            Nonce::<U16>::from_slice(&iv),
            b"",
            buffer.as_mut_slice(),
            Tag::from_slice(&tag),
        )
        .map_err(|_| {
            PennywiseError::Decryption(
                "wrong password or corrupted backup".to_string(),
            )
        })?;

    Ok(buffer)
}

/// Encrypt a snapshot
pub fn encrypt(snapshot: &Snapshot, password: &Password) -> PennywiseResult<EncryptedEnvelope> {
    let json = Zeroizing::new(serde_json::to_vec(snapshot)?);
    seal(&json, password)
}

/// Decrypt an envelope to untyped JSON, leaving validation to the caller
pub fn decrypt_value(
    envelope: &EncryptedEnvelope,
    password: &Password,
) -> PennywiseResult<serde_json::Value> {
    let plaintext = open(envelope, password)?;
    serde_json::from_slice(&plaintext).map_err(|e| {
        PennywiseError::Decryption(format!("Decrypted payload is not valid JSON: {}", e))
    })
}

/// Decrypt an envelope to a snapshot; the exact inverse of `encrypt`
pub fn decrypt(envelope: &EncryptedEnvelope, password: &Password) -> PennywiseResult<Snapshot> {
    let plaintext = open(envelope, password)?;
    serde_json::from_slice(&plaintext).map_err(|e| {
        PennywiseError::Decryption(format!("Decrypted payload is not a snapshot: {}", e))
    })
}

//! Key derivation using PBKDF2
//!
//! Derives the AES-256 key from a backup password with PBKDF2-HMAC-SHA256.
//! The round count is deliberately high so each guess is expensive.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::OsRng;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::Password;

/// PBKDF2 iteration count
pub const PBKDF2_ROUNDS: u32 = 100_000;

/// Salt length in bytes
pub const SALT_SIZE: usize = 32;

/// Derived key length in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// Parameters for key derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDerivationParams {
    /// Salt, fresh for every encryption
    pub salt: [u8; SALT_SIZE],
    /// Iteration count
    pub rounds: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDerivationParams {
    /// Create new params with a random salt
    pub fn new() -> Self {
        let mut salt = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut salt);
        Self::with_salt(salt)
    }

    /// Create params around a stored salt
    pub fn with_salt(salt: [u8; SALT_SIZE]) -> Self {
        Self {
            salt,
            rounds: PBKDF2_ROUNDS,
        }
    }
}

/// A derived encryption key, zeroed on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

/// Derive an encryption key from a password
pub fn derive_key(password: &Password, params: &KeyDerivationParams) -> DerivedKey {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &params.salt, params.rounds, &mut key);
    let derived = DerivedKey { key };
    key.zeroize();
    derived
}

//! Cryptographic functions for Pennywise
//!
//! Provides the password-derived AES-256-GCM envelope that wraps encrypted
//! backups. Keys come from PBKDF2-HMAC-SHA256 over the user's password.

pub mod encryption;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{decrypt, decrypt_value, encrypt, open, seal, EncryptedEnvelope, ALGORITHM};
pub use key_derivation::{derive_key, DerivedKey, KeyDerivationParams};
pub use secure_memory::Password;

//! Secure memory handling for passwords
//!
//! `Password` zeroes its buffer on drop and never prints its contents.

use std::fmt;
use std::ops::Deref;

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A user-supplied backup password
///
/// Deserializes from a plain JSON string so it can sit directly inside
/// request options.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Deserialize)]
#[serde(transparent)]
pub struct Password {
    inner: String,
}

impl Password {
    /// Wrap a password
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Get the password text
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the password as bytes, as fed to key derivation
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }
}

impl Deref for Password {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

//! Credential handling for target passwords
//!
//! Target passwords travel from the control plane into export tool arguments.
//! They are wrapped in `secrecy::Secret` so that `Debug` output never shows
//! them and the memory is zeroed once the last copy is dropped.
//!
//! ```rust
//! use dbkeeper::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let password = secret_string("hunter2".to_string());
//! assert_eq!(password.expose_secret().as_str(), "hunter2");
//! assert!(!format!("{password:?}").contains("hunter2"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret};
use serde::{Deserialize, Deserializer};
use zeroize::Zeroize;

/// String newtype that satisfies the trait bounds `Secret` needs
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Borrow the raw value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string, redacted in `Debug` and zeroized on drop
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string into a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

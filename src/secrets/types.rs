//! Redacting wrapper for Vault credentials.
//!
//! Tokens, role ids and secret ids flow through configuration, the login
//! handshake and every KV request. Wrapping them keeps them out of `Debug`
//! output and structured log fields.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string wrapper that redacts its contents in `Debug` and `Display`.
///
/// Memory is zeroed when the value is dropped. The raw value is only reachable
/// through [`SecretString::expose_secret`].
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new SecretString from a string value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the underlying value. Never log the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_string_redacts_debug() {
        let token = SecretString::new("hvs.CAESIJ-super-secret");
        let debug_output = format!("{:?}", token);

        assert_eq!(debug_output, "SecretString([REDACTED])");
        assert!(!debug_output.contains("hvs."));
    }

    #[test]
    fn test_secret_string_redacts_display() {
        let token = SecretString::new("hvs.CAESIJ-super-secret");
        assert_eq!(format!("{}", token), "[REDACTED]");
    }

    #[test]
    fn test_secret_string_expose() {
        let token = SecretString::new("s.abc123");
        assert_eq!(token.expose_secret(), "s.abc123");
        assert!(!token.is_empty());
        assert!(SecretString::new("").is_empty());
    }

    #[test]
    fn test_redacted_inside_derived_debug() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct Credentials {
            role_id: String,
            secret_id: SecretString,
        }

        let creds = Credentials {
            role_id: "exporter-role".to_string(),
            secret_id: SecretString::new("do-not-print"),
        };

        let output = format!("{:?}", creds);
        assert!(output.contains("exporter-role"));
        assert!(!output.contains("do-not-print"));
    }
}

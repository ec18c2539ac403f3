//! Error types for secret backend operations.

use thiserror::Error;

/// Result type for secret backend operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Errors that can occur while talking to the secret backend.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// Secret not found in the backend.
    #[error("Secret not found: {key}")]
    NotFound { key: String },

    /// Failed to connect to the secrets backend.
    #[error("Backend connection failed: {message}")]
    ConnectionFailed { message: String },

    /// Authentication with the secrets backend failed.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// Backend answered with an unexpected status or payload.
    #[error("Backend error: {message}")]
    BackendError { message: String },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

impl SecretsError {
    /// Create a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed { message: message.into() }
    }

    /// Create an authentication failed error.
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed { message: message.into() }
    }

    /// Create a backend error.
    pub fn backend_error(message: impl Into<String>) -> Self {
        Self::BackendError { message: message.into() }
    }

    /// Create a config error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let err = SecretsError::not_found("app/db");
        assert!(matches!(err, SecretsError::NotFound { .. }));
        assert_eq!(err.to_string(), "Secret not found: app/db");

        let err = SecretsError::connection_failed("timeout");
        assert!(matches!(err, SecretsError::ConnectionFailed { .. }));

        let err = SecretsError::backend_error("status 503");
        assert_eq!(err.to_string(), "Backend error: status 503");
    }
}

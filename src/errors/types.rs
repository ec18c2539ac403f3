//! # Error Types
//!
//! Process-level error types for the exporter using `thiserror`.

/// Custom result type for exporter operations
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Main error type for the exporter process
#[derive(thiserror::Error, Debug)]
pub enum ExporterError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// Secret backend errors raised outside a scrape (client setup, login)
    #[error(transparent)]
    Secrets(#[from] crate::secrets::SecretsError),

    /// Network transport errors (listener bind, serve loop)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
}

impl ExporterError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }
}

impl From<std::io::Error> for ExporterError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<validator::ValidationErrors> for ExporterError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = ExporterError::config("VAULT_ADDR environment variable is required");
        assert!(matches!(error, ExporterError::Config { .. }));
        assert_eq!(
            error.to_string(),
            "Configuration error: VAULT_ADDR environment variable is required"
        );
    }

    #[test]
    fn test_validation_error_field() {
        let error = ExporterError::validation_field("Port must be between 1 and 65535", "port");
        if let ExporterError::Validation { field, .. } = error {
            assert_eq!(field, Some("port".to_string()));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_io_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let error: ExporterError = io_error.into();
        assert!(matches!(error, ExporterError::Io { .. }));
    }

    #[test]
    fn test_secrets_conversion_is_transparent() {
        let error: ExporterError =
            crate::secrets::SecretsError::authentication_failed("token expired").into();
        assert_eq!(error.to_string(), "Authentication failed: token expired");
    }
}

//! Failures that can occur during a scrape.
//!
//! None of these escape [`super::MetricCollector::collect`]; they are logged and
//! counted. The variant decides how much of the scrape is lost.

use thiserror::Error;

use crate::secrets::SecretsError;

/// Errors raised while walking the secret tree or classifying metadata.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// A listing request failed. Aborts the whole walk.
    #[error("Failed to list secrets at '{path}': {source}")]
    Listing {
        path: String,
        #[source]
        source: SecretsError,
    },

    /// The listing payload was not a sequence of strings. Aborts the whole walk.
    #[error("Invalid key format at path: '{path}'")]
    MalformedListing { path: String },

    /// Metadata for one path could not be fetched. Only that path is skipped.
    #[error("Failed to get metadata for path '{path}': {source}")]
    MetadataFetch {
        path: String,
        #[source]
        source: SecretsError,
    },

    /// `expiry_date` was present but not RFC 3339. Only the expiry sample is skipped.
    #[error("Invalid date format for path '{path}': '{value}'")]
    DateParse {
        path: String,
        value: String,
        #[source]
        source: DateFormatError,
    },
}

/// Why an `expiry_date` value was rejected.
#[derive(Error, Debug)]
pub enum DateFormatError {
    /// Not shaped like `YYYY-MM-DDTHH:MM:SS[.fraction](Z|+HH:MM|-HH:MM)`.
    #[error("expected an RFC 3339 timestamp such as 2006-01-02T15:04:05Z")]
    Layout,

    /// Correct shape but an out-of-range field.
    #[error(transparent)]
    Invalid(#[from] chrono::ParseError),
}

impl CollectionError {
    /// Whether this failure aborts the walk rather than a single path.
    pub fn is_structural(&self) -> bool {
        matches!(self, CollectionError::Listing { .. } | CollectionError::MalformedListing { .. })
    }

    /// The path the failure is attributed to.
    pub fn path(&self) -> &str {
        match self {
            CollectionError::Listing { path, .. }
            | CollectionError::MalformedListing { path }
            | CollectionError::MetadataFetch { path, .. }
            | CollectionError::DateParse { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_classification() {
        let listing = CollectionError::MalformedListing { path: "apps".to_string() };
        assert!(listing.is_structural());
        assert_eq!(listing.to_string(), "Invalid key format at path: 'apps'");

        let fetch = CollectionError::MetadataFetch {
            path: "apps/db".to_string(),
            source: SecretsError::not_found("apps/db"),
        };
        assert!(!fetch.is_structural());
        assert_eq!(fetch.path(), "apps/db");
    }

    #[test]
    fn test_date_parse_keeps_raw_value() {
        let source = chrono::DateTime::parse_from_rfc3339("2030-13-01T00:00:00Z").unwrap_err();
        let error = CollectionError::DateParse {
            path: "apps/api".to_string(),
            value: "not-a-date".to_string(),
            source: source.into(),
        };
        assert!(!error.is_structural());
        assert!(error.to_string().contains("'not-a-date'"));
    }
}

//! Core secret store trait and metadata types.

use async_trait::async_trait;
use std::collections::HashMap;

use super::error::Result;

/// A single custom metadata value as stored by the backend.
///
/// Vault does not enforce a type on custom metadata, so values are kept as a
/// tagged variant and callers match on the shape they accept. Nothing is
/// coerced: a numeric `expiry_date` stays a number.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Bool(bool),
    Number(serde_json::Number),
    Null,
    /// Arrays and objects.
    Structured(serde_json::Value),
}

impl MetadataValue {
    /// Returns the value when it is a string, `None` for every other shape.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(text) => Some(text),
            MetadataValue::Bool(_)
            | MetadataValue::Number(_)
            | MetadataValue::Null
            | MetadataValue::Structured(_) => None,
        }
    }
}

impl From<serde_json::Value> for MetadataValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => MetadataValue::Text(text),
            serde_json::Value::Bool(flag) => MetadataValue::Bool(flag),
            serde_json::Value::Number(number) => MetadataValue::Number(number),
            serde_json::Value::Null => MetadataValue::Null,
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                MetadataValue::Structured(other)
            }
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(text: &str) -> Self {
        MetadataValue::Text(text.to_string())
    }
}

/// Metadata attached to one secret path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecretMetadata {
    /// User supplied key/value pairs; `None` when the backend sent none.
    pub custom_metadata: Option<HashMap<String, MetadataValue>>,
}

impl SecretMetadata {
    /// Metadata carrying the given custom fields.
    pub fn with_custom<K, V, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MetadataValue>,
    {
        Self {
            custom_metadata: Some(
                fields.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
            ),
        }
    }

    /// Look up a custom field. `None` when either the mapping or the key is absent.
    pub fn custom_field(&self, name: &str) -> Option<&MetadataValue> {
        self.custom_metadata.as_ref().and_then(|fields| fields.get(name))
    }
}

/// Read-only view of a hierarchical secret store.
///
/// Implementations are shared between scrapes and must tolerate concurrent
/// use. Neither method retries.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// List the children of `path` in the metadata namespace.
    ///
    /// Returns the raw `keys` payload exactly as the backend sent it, or
    /// `None` when there is nothing at `path`. Validating the payload's shape
    /// is left to the caller.
    async fn list_keys(&self, path: &str) -> Result<Option<serde_json::Value>>;

    /// Fetch the metadata of the leaf secret at `path`.
    ///
    /// `Ok(None)` means the backend answered but carried no metadata.
    async fn read_metadata(&self, path: &str) -> Result<Option<SecretMetadata>>;
}

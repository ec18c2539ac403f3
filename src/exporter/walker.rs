//! Recursive discovery of leaf secret paths.
//!
//! Vault exposes the KV namespace as directories: a listing returns child
//! names, and a trailing `/` marks a child as a sub-directory. The walker
//! follows those markers depth-first and returns every leaf relative to the
//! mount.

use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::error::CollectionError;
use crate::secrets::SecretStore;

const SEPARATOR: char = '/';

/// Normalized location of a leaf secret relative to its mount.
///
/// Never starts or ends with a separator and never contains an empty segment
/// introduced by joining. Only the walker creates these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecretPath(String);

impl SecretPath {
    pub(crate) fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SecretPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One child of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEntry {
    /// Sub-directory name with its trailing separator removed.
    Directory(String),
    Leaf(String),
}

impl ListingEntry {
    fn from_name(name: String) -> Self {
        match name.strip_suffix(SEPARATOR) {
            Some(directory) => ListingEntry::Directory(directory.to_string()),
            None => ListingEntry::Leaf(name),
        }
    }
}

/// A validated directory listing, in backend order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingNode {
    pub entries: Vec<ListingEntry>,
}

impl ListingNode {
    /// Validate a raw `keys` payload listed at `path`.
    ///
    /// # Errors
    ///
    /// [`CollectionError::MalformedListing`] unless `keys` is an array of strings.
    pub fn parse(path: &str, keys: serde_json::Value) -> Result<Self, CollectionError> {
        let malformed = || CollectionError::MalformedListing { path: path.to_string() };

        let serde_json::Value::Array(items) = keys else {
            return Err(malformed());
        };

        let entries = items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(name) => Ok(ListingEntry::from_name(name)),
                _ => Err(malformed()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { entries })
    }
}

/// Join a child name onto a base path with a single separator, trimming any
/// separator left at either end (an empty base yields just the child).
pub fn join_path(base: &str, name: &str) -> String {
    format!("{}{}{}", base, SEPARATOR, name).trim_matches(SEPARATOR).to_string()
}

/// Enumerates every leaf secret below a base path.
#[derive(Clone)]
pub struct PathWalker {
    store: Arc<dyn SecretStore>,
}

impl PathWalker {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// List every leaf secret reachable from `base_path`.
    ///
    /// Order follows listing order within a directory and depth-first
    /// traversal; callers should treat the result as a set.
    ///
    /// # Errors
    ///
    /// Any listing failure at any depth aborts the walk; no partial result is
    /// returned.
    pub async fn list_all_secrets(
        &self,
        base_path: &str,
    ) -> Result<Vec<SecretPath>, CollectionError> {
        let mut paths = Vec::new();
        self.walk(base_path.trim_matches(SEPARATOR).to_string(), &mut paths).await?;
        debug!(base_path = %base_path, leaf_count = paths.len(), "Completed secret walk");
        Ok(paths)
    }

    fn walk<'a>(
        &'a self,
        path: String,
        out: &'a mut Vec<SecretPath>,
    ) -> BoxFuture<'a, Result<(), CollectionError>> {
        async move {
            let keys = self
                .store
                .list_keys(&path)
                .await
                .map_err(|source| CollectionError::Listing { path: path.clone(), source })?;

            let Some(keys) = keys else {
                return Ok(());
            };

            for entry in ListingNode::parse(&path, keys)?.entries {
                match entry {
                    // "/" alone would name the directory itself and never terminate.
                    ListingEntry::Directory(name) if name.is_empty() => {
                        debug!(path = %path, "Skipping empty directory name in listing");
                    }
                    ListingEntry::Directory(name) => {
                        self.walk(join_path(&path, &name), out).await?;
                    }
                    ListingEntry::Leaf(name) => {
                        out.push(SecretPath::new(join_path(&path, &name)));
                    }
                }
            }

            Ok(())
        }
        .boxed()
    }
}

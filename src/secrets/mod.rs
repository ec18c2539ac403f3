//! Secret backend abstraction.
//!
//! The exporter only ever reads metadata. [`SecretStore`] is the seam between
//! the collection core and the backend: the core walks and classifies, the
//! store performs directory listings and metadata reads.
//!
//! # Supported Backends
//!
//! - **HashiCorp Vault KV v2** ([`VaultSecretStore`]), authenticated with a
//!   token or an AppRole login.

pub mod client;
pub mod error;
pub mod types;
pub mod vault;

pub use client::{MetadataValue, SecretMetadata, SecretStore};
pub use error::{Result, SecretsError};
pub use types::SecretString;
pub use vault::{authenticate, VaultAuth, VaultConfig, VaultSecretStore};

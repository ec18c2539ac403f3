//! # Vault Secrets Exporter
//!
//! A Prometheus exporter that reports how long each secret in a HashiCorp
//! Vault KV v2 mount has left before it expires.
//!
//! Expiry is declared by whoever writes the secret, as an RFC 3339 timestamp
//! in the `expiry_date` custom metadata field. On every scrape the exporter
//! walks the mount, reads each secret's metadata and exposes:
//!
//! - `vault_secret_expiry_days_remaining{path, owner_email, usage_description}`
//! - `vault_secret_has_no_expiry_date{path}`
//! - `vault_exporter_scrape_errors_total`
//!
//! ## Architecture
//!
//! ```text
//! GET /metrics → MetricCollector → PathWalker ─┐
//!                      │                       ├→ SecretStore (Vault KV v2)
//!                      └── metadata reads ─────┘
//!                      ↓
//!               Prometheus text rendering
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vault_secrets_exporter::{
//!     api::start_server, ExporterConfig, MetricCollector, Result, ScrapeErrorCounter,
//!     VaultSecretStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ExporterConfig::from_env()?;
//!     let store = Arc::new(VaultSecretStore::connect(&config.vault).await?);
//!     let collector = MetricCollector::new(
//!         store,
//!         config.vault.mount_path.clone(),
//!         Arc::new(ScrapeErrorCounter::new()),
//!     );
//!     start_server(&config.server, Arc::new(collector)).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod exporter;
pub mod observability;
pub mod secrets;

// Re-export commonly used types and traits
pub use config::ExporterConfig;
pub use errors::{ExporterError, Result};
pub use exporter::{MetricCollector, PathWalker, Sample, ScrapeErrorCounter, SecretPath};
pub use secrets::{SecretStore, VaultSecretStore};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

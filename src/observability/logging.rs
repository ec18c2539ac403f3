//! # Structured Logging
//!
//! Installs the global `tracing` subscriber and provides span macros used
//! across the exporter.
//!
//! Output is JSON lines by default so it can be shipped as-is; `text` gives a
//! human readable format for local runs. `RUST_LOG` takes precedence over the
//! configured level when set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{ExporterConfig, LogFormat, ObservabilityConfig};
use crate::errors::{ExporterError, Result};

/// Create a tracing span covering one scrape of a mount.
///
/// Every scrape gets its own `scrape_id` so log lines from overlapping
/// scrapes can be told apart.
///
/// ```rust,ignore
/// let span = scrape_span!("secret");
/// let span = scrape_span!("secret", concurrency = 4);
/// ```
#[macro_export]
macro_rules! scrape_span {
    ($mount:expr) => {
        tracing::info_span!(
            "scrape",
            mount = %$mount,
            scrape_id = %uuid::Uuid::new_v4()
        )
    };
    ($mount:expr, $($field:tt)*) => {
        tracing::info_span!(
            "scrape",
            mount = %$mount,
            scrape_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Create a tracing span for an inbound HTTP request.
#[macro_export]
macro_rules! request_span {
    ($method:expr, $path:expr) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            request_id = %uuid::Uuid::new_v4()
        )
    };
}

/// Create a tracing span for a backend request.
#[macro_export]
macro_rules! vault_span {
    ($operation:expr, $path:expr) => {
        tracing::debug_span!(
            "vault_request",
            operation = %$operation,
            path = %$path
        )
    };
}

/// Build the level filter, preferring `RUST_LOG` over the configured level.
pub fn build_filter(config: &ObservabilityConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            ExporterError::config_with_source(
                format!("Invalid log level '{}'", config.log_level),
                Box::new(e),
            )
        }),
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails when the level directive does not parse or a global subscriber is
/// already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    };

    installed.map_err(|e| {
        ExporterError::config_with_source("Failed to install tracing subscriber", Box::new(e))
    })
}

/// Log configuration at startup. Credentials are never logged.
pub fn log_config_info(config: &ExporterConfig) {
    tracing::info!(
        listen_address = %config.server.bind_address(),
        vault_address = %config.vault.address,
        vault_namespace = config.vault.namespace.as_deref().unwrap_or(""),
        kv_mount = %config.vault.mount_path,
        auth_method = config.vault.auth.method(),
        metadata_concurrency = config.collection.metadata_concurrency,
        log_format = %config.observability.log_format,
        "Vault secrets exporter configuration"
    );
}

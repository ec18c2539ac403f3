//! # Configuration Settings
//!
//! Defines the configuration structure for the exporter and loads it from
//! environment variables.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use validator::Validate;

use crate::errors::{ExporterError, Result};
use crate::secrets::{SecretString, VaultAuth, VaultConfig};

const DEFAULT_MOUNT_PATH: &str = "secret";
const DEFAULT_APPROLE_MOUNT: &str = "approle";
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Main exporter configuration
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Vault connection and credentials
    pub vault: VaultConfig,

    /// HTTP listener configuration
    pub server: ServerConfig,

    /// Scrape behaviour
    pub collection: CollectionConfig,

    /// Logging configuration
    pub observability: ObservabilityConfig,
}

impl ExporterConfig {
    /// Create configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones.
    ///
    /// # Errors
    ///
    /// - `VAULT_ADDR` is missing
    /// - neither `VAULT_TOKEN` nor both `VAULT_ROLE_ID` and `VAULT_SECRET_ID` are set
    /// - a numeric or enumerated variable does not parse
    /// - a value is out of range
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let address = get("VAULT_ADDR")
            .ok_or_else(|| ExporterError::validation_field("VAULT_ADDR is required", "VAULT_ADDR"))?;

        let auth = match (get("VAULT_TOKEN"), get("VAULT_ROLE_ID"), get("VAULT_SECRET_ID")) {
            (Some(token), _, _) => VaultAuth::Token(SecretString::new(token)),
            (None, Some(role_id), Some(secret_id)) => VaultAuth::AppRole {
                mount: get("VAULT_APPROLE_MOUNT")
                    .unwrap_or_else(|| DEFAULT_APPROLE_MOUNT.to_string()),
                role_id,
                secret_id: SecretString::new(secret_id),
            },
            _ => {
                return Err(ExporterError::config(
                    "No authentication method configured: set VAULT_TOKEN or both VAULT_ROLE_ID and VAULT_SECRET_ID",
                ))
            }
        };

        let request_timeout_seconds = parse_var(
            &get,
            "VAULT_REQUEST_TIMEOUT_SECONDS",
            DEFAULT_REQUEST_TIMEOUT_SECONDS,
        )?;
        if request_timeout_seconds == 0 {
            return Err(ExporterError::validation_field(
                "Request timeout must be at least 1 second",
                "VAULT_REQUEST_TIMEOUT_SECONDS",
            ));
        }

        let vault = VaultConfig {
            address,
            namespace: get("VAULT_NAMESPACE"),
            mount_path: get("KV_MOUNT_PATH")
                .map(|mount| mount.trim_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_MOUNT_PATH.to_string()),
            auth,
            request_timeout: Duration::from_secs(request_timeout_seconds),
        };

        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: get("EXPORTER_HOST").unwrap_or(server_defaults.host),
            port: parse_var(&get, "EXPORTER_PORT", server_defaults.port)?,
        };

        let collection = CollectionConfig {
            metadata_concurrency: parse_var(
                &get,
                "EXPORTER_METADATA_CONCURRENCY",
                CollectionConfig::default().metadata_concurrency,
            )?,
        };

        let observability_defaults = ObservabilityConfig::default();
        let observability = ObservabilityConfig {
            log_level: get("EXPORTER_LOG_LEVEL").unwrap_or(observability_defaults.log_level),
            log_format: parse_var(&get, "EXPORTER_LOG_FORMAT", observability_defaults.log_format)?,
        };

        let config = Self { vault, server, collection, observability };
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate().map_err(ExporterError::from)?;
        self.collection.validate().map_err(ExporterError::from)?;
        self.observability.validate().map_err(ExporterError::from)?;

        if self.vault.mount_path.is_empty() {
            return Err(ExporterError::validation_field(
                "KV mount path cannot be empty",
                "KV_MOUNT_PATH",
            ));
        }

        Ok(())
    }
}

fn parse_var<G, T>(get: &G, key: &str, default: T) -> Result<T>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            ExporterError::config(format!("Invalid value '{}' for {}: {}", raw, key, e))
        }),
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Validate)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, max = 65535, message = "Port must be between 1 and 65535"))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 9102 }
    }
}

impl ServerConfig {
    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Scrape configuration
#[derive(Debug, Clone, Validate)]
pub struct CollectionConfig {
    /// Maximum metadata requests in flight during one scrape
    #[validate(range(
        min = 1,
        max = 64,
        message = "Metadata concurrency must be between 1 and 64"
    ))]
    pub metadata_concurrency: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self { metadata_concurrency: 1 }
    }
}

/// Log output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" | "pretty" => Ok(LogFormat::Text),
            other => Err(format!("unknown log format '{}', expected 'json' or 'text'", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => f.write_str("json"),
            LogFormat::Text => f.write_str("text"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Validate)]
pub struct ObservabilityConfig {
    /// Default filter directive (trace, debug, info, warn, error, or a full directive)
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Output encoding
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), log_format: LogFormat::Json }
    }
}

//! HashiCorp Vault KV v2 metadata client.
//!
//! Authentication uses `vaultrs`: a configured token is verified with a
//! `lookup-self` call, otherwise an AppRole login exchanges the role id and
//! secret id for a client token. The resulting token is then used for raw
//! KV v2 metadata requests issued with `reqwest`, which keeps custom metadata
//! values in their original JSON shape instead of coercing them to strings.
//!
//! # Requests
//!
//! - list: `GET {address}/v1/{mount}/metadata/{path}/?list=true`
//! - metadata: `GET {address}/v1/{mount}/metadata/{path}`
//!
//! Every request carries `X-Vault-Token` and, when configured,
//! `X-Vault-Namespace`.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, Instrument};
use url::Url;
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};

use super::client::{MetadataValue, SecretMetadata, SecretStore};
use super::error::{Result, SecretsError};
use super::types::SecretString;

const TOKEN_HEADER: &str = "X-Vault-Token";
const NAMESPACE_HEADER: &str = "X-Vault-Namespace";

/// How the exporter authenticates against Vault.
#[derive(Debug, Clone, PartialEq)]
pub enum VaultAuth {
    /// A pre-issued token, verified at startup.
    Token(SecretString),
    /// AppRole login exchanging role id and secret id for a token.
    AppRole { mount: String, role_id: String, secret_id: SecretString },
}

impl VaultAuth {
    /// Short label for logs.
    pub fn method(&self) -> &'static str {
        match self {
            VaultAuth::Token(_) => "token",
            VaultAuth::AppRole { .. } => "approle",
        }
    }
}

/// Connection settings for the Vault backend.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Vault server address (e.g., "https://vault.example.com:8200")
    pub address: String,

    /// Vault namespace (for Enterprise multi-tenancy)
    pub namespace: Option<String>,

    /// KV v2 mount path (default: "secret")
    pub mount_path: String,

    /// Authentication material
    pub auth: VaultAuth,

    /// Timeout applied to every KV metadata request
    pub request_timeout: Duration,
}

/// Perform the authentication handshake and return the token to use for
/// subsequent requests.
///
/// # Errors
///
/// - [`SecretsError::ConfigError`] if the client settings are invalid
/// - [`SecretsError::AuthenticationFailed`] if the token is invalid or the
///   AppRole login is rejected or returns no client token
pub async fn authenticate(config: &VaultConfig) -> Result<SecretString> {
    let mut settings_builder = VaultClientSettingsBuilder::default();
    settings_builder.address(&config.address);

    if let VaultAuth::Token(ref token) = config.auth {
        settings_builder.token(token.expose_secret());
    }

    if let Some(ref namespace) = config.namespace {
        settings_builder.namespace(Some(namespace.clone()));
    }

    let settings = settings_builder.build().map_err(|e| {
        SecretsError::config_error(format!("Invalid Vault configuration: {}", e))
    })?;

    let client = VaultClient::new(settings).map_err(|e| {
        SecretsError::connection_failed(format!("Failed to create Vault client: {}", e))
    })?;

    match &config.auth {
        VaultAuth::Token(token) => {
            info!("Authenticating using VAULT_TOKEN");
            vaultrs::token::lookup_self(&client).await.map_err(|e| {
                SecretsError::authentication_failed(format!(
                    "VAULT_TOKEN is invalid or expired: {}",
                    e
                ))
            })?;
            info!("VAULT_TOKEN is valid");
            Ok(token.clone())
        }
        VaultAuth::AppRole { mount, role_id, secret_id } => {
            info!(approle_mount = %mount, "VAULT_TOKEN not set, authenticating using AppRole");
            let auth =
                vaultrs::auth::approle::login(&client, mount, role_id, secret_id.expose_secret())
                    .await
                    .map_err(|e| {
                        SecretsError::authentication_failed(format!(
                            "Failed to login with AppRole: {}",
                            e
                        ))
                    })?;

            let token = SecretString::new(auth.client_token);
            if token.is_empty() {
                return Err(SecretsError::authentication_failed(
                    "No auth info was returned after AppRole login",
                ));
            }

            info!("AppRole authentication successful");
            Ok(token)
        }
    }
}

#[derive(Debug, Deserialize)]
struct VaultResponse<T> {
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ListData {
    keys: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MetadataData {
    custom_metadata: Option<HashMap<String, serde_json::Value>>,
}

/// KV v2 metadata reader backed by Vault's HTTP API.
///
/// This client is `Send + Sync` and safe to share across concurrent scrapes.
pub struct VaultSecretStore {
    http: reqwest::Client,
    base_url: Url,
    mount_path: String,
    namespace: Option<String>,
    token: SecretString,
}

impl std::fmt::Debug for VaultSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSecretStore")
            .field("base_url", &self.base_url.as_str())
            .field("mount_path", &self.mount_path)
            .field("namespace", &self.namespace)
            .field("token", &self.token)
            .finish()
    }
}

impl VaultSecretStore {
    /// Create a store that uses an already obtained token.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::ConfigError`] if the address is not a valid base URL
    pub fn new(config: &VaultConfig, token: SecretString) -> Result<Self> {
        if config.address.is_empty() {
            return Err(SecretsError::config_error("Vault address cannot be empty"));
        }

        let base_url = Url::parse(&config.address).map_err(|e| {
            SecretsError::config_error(format!("Invalid Vault address '{}': {}", config.address, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(SecretsError::config_error(format!(
                "Vault address '{}' cannot be used as a base URL",
                config.address
            )));
        }

        let http = reqwest::Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            http,
            base_url,
            mount_path: config.mount_path.clone(),
            namespace: config.namespace.clone(),
            token,
        })
    }

    /// Authenticate with the configured method and build the store.
    pub async fn connect(config: &VaultConfig) -> Result<Self> {
        let token = authenticate(config).await?;
        let store = Self::new(config, token)?;
        info!(
            address = %config.address,
            mount_path = %config.mount_path,
            namespace = ?config.namespace,
            "Initialized Vault KV metadata client"
        );
        Ok(store)
    }

    /// KV mount this store reads from.
    pub fn mount_path(&self) -> &str {
        &self.mount_path
    }

    /// Build `{base}/v1/{mount}/metadata/{path}`, encoding each segment.
    fn metadata_url(&self, path: &str, directory: bool) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                SecretsError::config_error("Vault address cannot be used as a base URL")
            })?;
            segments.pop_if_empty().push("v1");
            segments.extend(self.mount_path.split('/').filter(|s| !s.is_empty()));
            segments.push("metadata");
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            if directory {
                segments.push("");
            }
        }
        Ok(url)
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.http.get(url).header(TOKEN_HEADER, self.token.expose_secret());
        match self.namespace {
            Some(ref namespace) => request.header(NAMESPACE_HEADER, namespace),
            None => request,
        }
    }
}

fn status_error(status: StatusCode, operation: &str, path: &str) -> SecretsError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SecretsError::authentication_failed(
            format!("Vault denied {} for '{}' (status {})", operation, path, status.as_u16()),
        ),
        _ => SecretsError::backend_error(format!(
            "Vault {} for '{}' failed with status {}",
            operation,
            path,
            status.as_u16()
        )),
    }
}

#[async_trait]
impl SecretStore for VaultSecretStore {
    async fn list_keys(&self, path: &str) -> Result<Option<serde_json::Value>> {
        let url = self.metadata_url(path, true)?;
        let response = self
            .get(url)
            .query(&[("list", "true")])
            .send()
            .instrument(crate::vault_span!("list", path))
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(path = %path, "Vault returned no listing");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(status_error(status, "list", path));
        }

        let body: VaultResponse<ListData> = response.json().await?;
        Ok(body.data.and_then(|data| data.keys))
    }

    async fn read_metadata(&self, path: &str) -> Result<Option<SecretMetadata>> {
        let url = self.metadata_url(path, false)?;
        let response =
            self.get(url).send().instrument(crate::vault_span!("read_metadata", path)).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SecretsError::not_found(path));
        }
        if !status.is_success() {
            return Err(status_error(status, "metadata read", path));
        }

        let body: VaultResponse<MetadataData> = response.json().await?;
        Ok(body.data.map(|data| SecretMetadata {
            custom_metadata: data.custom_metadata.map(|fields| {
                fields.into_iter().map(|(key, value)| (key, MetadataValue::from(value))).collect()
            }),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(address: &str, mount_path: &str) -> VaultConfig {
        VaultConfig {
            address: address.to_string(),
            namespace: None,
            mount_path: mount_path.to_string(),
            auth: VaultAuth::Token(SecretString::new("test-token")),
            request_timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_metadata_url_for_root_listing() {
        let store =
            VaultSecretStore::new(&config("http://127.0.0.1:8200", "secret"), "t".into()).unwrap();
        let url = store.metadata_url("", true).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8200/v1/secret/metadata/");
    }

    #[test]
    fn test_metadata_url_for_nested_leaf() {
        let store =
            VaultSecretStore::new(&config("http://127.0.0.1:8200/", "kv/team"), "t".into())
                .unwrap();
        let url = store.metadata_url("app/db creds", false).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8200/v1/kv/team/metadata/app/db%20creds");
    }

    #[test]
    fn test_rejects_invalid_address() {
        let err = VaultSecretStore::new(&config("not a url", "secret"), "t".into()).unwrap_err();
        assert!(matches!(err, SecretsError::ConfigError { .. }));

        let err = VaultSecretStore::new(&config("", "secret"), "t".into()).unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let store =
            VaultSecretStore::new(&config("http://127.0.0.1:8200", "secret"), "hvs.x".into())
                .unwrap();
        let output = format!("{:?}", store);
        assert!(!output.contains("hvs.x"));
        assert!(output.contains("[REDACTED]"));
    }

    #[test]
    fn test_auth_method_labels() {
        assert_eq!(VaultAuth::Token("t".into()).method(), "token");
        let approle = VaultAuth::AppRole {
            mount: "approle".to_string(),
            role_id: "role".to_string(),
            secret_id: "secret".into(),
        };
        assert_eq!(approle.method(), "approle");
    }
}

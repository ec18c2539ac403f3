//! Common test utilities for all integration tests.
//!
//! Provides a wiremock-backed Vault server speaking just enough of the KV v2
//! metadata API, the token lookup and the AppRole login for the exporter.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

use std::time::Duration;

use serde_json::{json, Value};
use vault_secrets_exporter::secrets::{SecretString, VaultAuth, VaultConfig};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "hvs.integration-test";
pub const MOUNT: &str = "secret";

/// Wrap `data` and `auth` in the envelope Vault puts around every response.
pub fn envelope(data: Value, auth: Value) -> Value {
    json!({
        "request_id": "5d2e4f5a-0f0e-4d3c-9a35-0d5c1fbd43b3",
        "lease_id": "",
        "renewable": false,
        "lease_duration": 0,
        "data": data,
        "wrap_info": null,
        "warnings": null,
        "auth": auth,
    })
}

/// Mock Vault server.
pub struct MockVault {
    pub server: MockServer,
}

impl MockVault {
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    pub fn address(&self) -> String {
        self.server.uri()
    }

    /// Client settings pointing at this server with token auth.
    pub fn config(&self) -> VaultConfig {
        VaultConfig {
            address: self.address(),
            namespace: None,
            mount_path: MOUNT.to_string(),
            auth: VaultAuth::Token(SecretString::new(TEST_TOKEN)),
            request_timeout: Duration::from_secs(5),
        }
    }

    fn list_path(dir: &str) -> String {
        if dir.is_empty() {
            format!("/v1/{}/metadata/", MOUNT)
        } else {
            format!("/v1/{}/metadata/{}/", MOUNT, dir)
        }
    }

    fn metadata_path(leaf: &str) -> String {
        format!("/v1/{}/metadata/{}", MOUNT, leaf)
    }

    /// Serve a directory listing at `dir` ("" for the mount root).
    pub async fn mount_listing(&self, dir: &str, keys: Value) {
        Mock::given(method("GET"))
            .and(path(Self::list_path(dir)))
            .and(query_param("list", "true"))
            .and(header("X-Vault-Token", TEST_TOKEN))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(envelope(json!({ "keys": keys }), Value::Null)),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer a listing at `dir` with a bare status code.
    pub async fn mount_listing_status(&self, dir: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(Self::list_path(dir)))
            .and(query_param("list", "true"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "errors": [] })))
            .mount(&self.server)
            .await;
    }

    /// Serve KV v2 metadata for `leaf` with the given custom metadata.
    pub async fn mount_metadata(&self, leaf: &str, custom_metadata: Value) {
        let data = json!({
            "cas_required": false,
            "created_time": "2024-01-01T00:00:00.000000Z",
            "current_version": 1,
            "custom_metadata": custom_metadata,
            "delete_version_after": "0s",
            "max_versions": 0,
            "oldest_version": 0,
            "updated_time": "2024-01-01T00:00:00.000000Z",
            "versions": {
                "1": {
                    "created_time": "2024-01-01T00:00:00.000000Z",
                    "deletion_time": "",
                    "destroyed": false
                }
            }
        });

        Mock::given(method("GET"))
            .and(path(Self::metadata_path(leaf)))
            .and(header("X-Vault-Token", TEST_TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(data, Value::Null)))
            .mount(&self.server)
            .await;
    }

    /// Answer a metadata read for `leaf` with a bare status code.
    pub async fn mount_metadata_status(&self, leaf: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(Self::metadata_path(leaf)))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "errors": [] })))
            .mount(&self.server)
            .await;
    }

    /// Accept `TEST_TOKEN` on `auth/token/lookup-self`.
    pub async fn mount_token_lookup(&self) {
        let data = json!({
            "accessor": "8609694a-cdbc-db9b-d345-e782dbb562ed",
            "creation_time": 1704067200,
            "creation_ttl": 2764800,
            "display_name": "token",
            "entity_id": "",
            "expire_time": "2024-02-02T00:00:00.000000Z",
            "explicit_max_ttl": 0,
            "id": TEST_TOKEN,
            "identity_policies": [],
            "issue_time": "2024-01-01T00:00:00.000000Z",
            "meta": {},
            "num_uses": 0,
            "orphan": true,
            "path": "auth/token/create",
            "policies": ["default", "exporter"],
            "renewable": false,
            "ttl": 2764800,
            "type": "service"
        });

        Mock::given(method("GET"))
            .and(path("/v1/auth/token/lookup-self"))
            .and(header("X-Vault-Token", TEST_TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(data, Value::Null)))
            .mount(&self.server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/auth/token/lookup-self"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({ "errors": ["permission denied"] })),
            )
            .mount(&self.server)
            .await;
    }

    /// Issue `client_token` from an AppRole login at `auth/{mount}/login`.
    pub async fn mount_approle_login(&self, mount: &str, client_token: &str) {
        let auth = json!({
            "client_token": client_token,
            "accessor": "fd6c9a00-d2dc-3b11-0be5-af7ae0e1d374",
            "policies": ["default", "exporter"],
            "token_policies": ["default", "exporter"],
            "metadata": { "role_name": "exporter" },
            "lease_duration": 1200,
            "renewable": true,
            "entity_id": "8d8a0b4e-4b5d-4a54-bc3d-3c2c6b0f6c55",
            "token_type": "service",
            "orphan": true,
            "mfa_requirement": null,
            "num_uses": 0
        });

        Mock::given(method("POST"))
            .and(path(format!("/v1/auth/{}/login", mount)))
            .respond_with(ResponseTemplate::new(200).set_body_json(envelope(Value::Null, auth)))
            .mount(&self.server)
            .await;
    }
}

use std::sync::Arc;

use tracing::{error, info};
use vault_secrets_exporter::{
    api::start_server,
    config::ObservabilityConfig,
    observability::{init_logging, log_config_info},
    ExporterConfig, MetricCollector, Result, ScrapeErrorCounter, VaultSecretStore, APP_NAME,
    VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (optional - won't fail if missing)
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let config = match ExporterConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Still report through the structured log before exiting.
            if init_logging(&ObservabilityConfig::default()).is_ok() {
                error!(error = %e, "Invalid configuration");
            }
            return Err(e);
        }
    };

    init_logging(&config.observability)?;
    info!(app_name = APP_NAME, version = VERSION, "Starting Vault Secrets Exporter");
    log_config_info(&config);

    let store = match VaultSecretStore::connect(&config.vault).await {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!(error = %e, "Authentication failed");
            return Err(e.into());
        }
    };

    let collector = MetricCollector::new(
        store,
        config.vault.mount_path.clone(),
        Arc::new(ScrapeErrorCounter::new()),
    )
    .with_metadata_concurrency(config.collection.metadata_concurrency);

    start_server(&config.server, Arc::new(collector)).await
}

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::errors::ExporterError;
use crate::exporter::MetricCollector;

use super::routes::build_router;

/// Bind the listener and serve until Ctrl-C.
pub async fn start_server(
    config: &ServerConfig,
    collector: Arc<MetricCollector>,
) -> crate::Result<()> {
    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address).await.map_err(|e| {
        ExporterError::transport(format!("Failed to bind listener on {}: {}", bind_address, e))
    })?;

    let addr: SocketAddr = listener.local_addr()?;
    info!(address = %addr, "Server listening");
    run_http_server(listener, build_router(collector)).await?;

    info!("Server shutdown completed");
    Ok(())
}

async fn run_http_server(listener: TcpListener, router: Router) -> crate::Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Shutdown listener failed");
            }
        })
        .await
        .map_err(|e| ExporterError::transport(format!("Server error: {}", e)))
}

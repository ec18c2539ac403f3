use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use crate::observability::{render_samples, EXPOSITION_CONTENT_TYPE};

use super::routes::ApiState;

const INDEX_PAGE: &str = r#"<html>
<head><title>Vault Secrets Exporter</title></head>
<body>
<h1>Vault Secrets Exporter</h1>
<p><a href='/metrics'>Metrics</a></p>
</body>
</html>"#;

/// Run one scrape and return the Prometheus exposition.
///
/// Always answers 200: scrape failures surface through
/// `vault_exporter_scrape_errors_total`, not the status code.
pub async fn metrics_handler(State(state): State<ApiState>) -> Response {
    let mut samples = Vec::new();
    state.collector.collect(&mut samples).await;
    debug!(sample_count = samples.len(), "Rendering scrape");

    ([(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], render_samples(&samples)).into_response()
}

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

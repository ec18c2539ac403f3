use std::sync::Arc;

use axum::{extract::Request, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::exporter::MetricCollector;

use super::handlers::{health_handler, index_handler, metrics_handler};

#[derive(Clone)]
pub struct ApiState {
    pub collector: Arc<MetricCollector>,
}

pub fn build_router(collector: Arc<MetricCollector>) -> Router {
    let state = ApiState { collector };

    Router::new()
        .route("/", get(index_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            crate::request_span!(request.method(), request.uri().path())
        }))
}

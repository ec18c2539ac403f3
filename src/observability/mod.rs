//! # Observability Infrastructure
//!
//! Structured logging for the exporter process and the Prometheus text
//! rendering of scrape results.

pub mod logging;
pub mod metrics;

pub use self::logging::{init_logging, log_config_info};
pub use self::metrics::{render_samples, EXPOSITION_CONTENT_TYPE};

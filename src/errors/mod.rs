//! # Error Handling
//!
//! Error types for the exporter process. Failures inside a scrape are modeled
//! separately by [`crate::exporter::CollectionError`] because they never escape
//! the collector; this module covers startup, configuration and serving.

pub mod types;

pub use types::{ExporterError, Result};

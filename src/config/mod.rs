//! # Configuration Management
//!
//! Environment driven configuration for the exporter. A `.env` file in the
//! working directory is honoured by the binary before loading.

pub mod settings;

pub use settings::{
    CollectionConfig, ExporterConfig, LogFormat, ObservabilityConfig, ServerConfig,
};

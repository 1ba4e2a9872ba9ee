//! # Configuration Modules
//!
//! Layered configuration for the fishery pipeline: built-in defaults, an
//! optional JSON file, `FISHERY_*` environment variables and CLI overrides.

/// Defaults, layering and validation of the pipeline configuration.
pub mod config_fishery;

pub use config_fishery::{ConfigLayer, FisheryConfig, DEFAULT_BASE_URL, NAME_TEMPLATE};

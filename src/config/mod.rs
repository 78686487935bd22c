//! Configuration module
//!
//! YAML configuration for a strategy list view and the API behind it.
//!
//! # Overview
//!
//! The config module provides:
//! - `FeedConfig` - API location, query/response mapping, HTTP and list settings
//! - `load_config` / `load_config_from_str` - YAML parsing with validation

mod loader;
mod types;

pub use loader::{load_config, load_config_from_str, validate_config};
pub use types::{ApiConfig, FeedConfig, HttpSettings, ListConfig, QueryParams, ResponsePaths};

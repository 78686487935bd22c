//! YAML loader for feed configuration
//!
//! Parses and validates a `FeedConfig` from a file or a string.

use crate::config::types::FeedConfig;
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;
use url::Url;

const MAX_PAGE_SIZE: u32 = 500;
const MAX_SEARCH_DEBOUNCE_MS: u64 = 10_000;

/// Load and validate a config file
pub fn load_config(path: impl AsRef<Path>) -> Result<FeedConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    debug!("Loaded config from {}", path.display());
    load_config_from_str(&content)
}

/// Load and validate a config from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<FeedConfig> {
    // An empty document deserialises to unit, not to an empty mapping
    let config: FeedConfig = if yaml.trim().is_empty() {
        FeedConfig::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))?
    };

    validate_config(&config)?;
    Ok(config)
}

/// Validate a loaded config
pub fn validate_config(config: &FeedConfig) -> Result<()> {
    let base_url = Url::parse(&config.api.base_url)
        .map_err(|e| Error::invalid_value("api.base_url", e.to_string()))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(Error::invalid_value(
            "api.base_url",
            format!("unsupported scheme '{}'", base_url.scheme()),
        ));
    }

    if config.api.list_path.trim().is_empty() {
        return Err(Error::invalid_value("api.list_path", "cannot be empty"));
    }

    if config.api.response.items_path.trim().is_empty() {
        return Err(Error::invalid_value(
            "api.response.items_path",
            "cannot be empty",
        ));
    }

    let mut seen = HashSet::new();
    for (key, name) in config.api.params.named() {
        if name.is_empty() {
            return Err(Error::invalid_value(
                format!("api.params.{key}"),
                "cannot be empty",
            ));
        }
        if !seen.insert(name) {
            return Err(Error::invalid_value(
                format!("api.params.{key}"),
                format!("duplicate query parameter '{name}'"),
            ));
        }
    }

    let list = &config.list;
    if list.page_size == 0 || list.page_size > MAX_PAGE_SIZE {
        return Err(Error::invalid_value(
            "list.page_size",
            format!("must be between 1 and {MAX_PAGE_SIZE}"),
        ));
    }

    if list.search_debounce_ms > MAX_SEARCH_DEBOUNCE_MS {
        return Err(Error::invalid_value(
            "list.search_debounce_ms",
            format!("must be at most {MAX_SEARCH_DEBOUNCE_MS}"),
        ));
    }

    if !list.scroll_threshold_px.is_finite() || list.scroll_threshold_px < 0.0 {
        return Err(Error::invalid_value(
            "list.scroll_threshold_px",
            "must be a finite, non-negative number",
        ));
    }

    Ok(())
}

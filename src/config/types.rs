//! Configuration types
//!
//! Every field has a default, so an empty YAML document is a valid
//! configuration for a local development server.

use crate::filter::FilterCriteria;
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::scroll::DEFAULT_THRESHOLD_PX;
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration loaded from YAML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Remote list API
    #[serde(default)]
    pub api: ApiConfig,

    /// HTTP client behaviour
    #[serde(default)]
    pub http: HttpSettings,

    /// List view behaviour
    #[serde(default)]
    pub list: ListConfig,
}

impl FeedConfig {
    /// HTTP client configuration derived from the `api` and `http` sections
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.api.base_url.clone())
            .timeout(Duration::from_millis(self.http.timeout_ms))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_millis(self.http.max_backoff_ms),
            );
        if let Some(rate_limit) = self.http.rate_limit {
            builder = builder.rate_limit(rate_limit);
        }
        for (key, value) in &self.api.headers {
            builder = builder.header(key.clone(), value.clone());
        }
        builder.build()
    }
}

// ============================================================================
// API
// ============================================================================

/// Location and shape of the paginated list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the strategy API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the list endpoint
    #[serde(default = "default_list_path")]
    pub list_path: String,

    /// Static headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Query parameter names
    #[serde(default)]
    pub params: QueryParams,

    /// Where to find items and total in the response body
    #[serde(default)]
    pub response: ResponsePaths,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            list_path: default_list_path(),
            headers: BTreeMap::new(),
            params: QueryParams::default(),
            response: ResponsePaths::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_list_path() -> String {
    "/api/strategies".to_string()
}

/// Query parameter names used by the list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Free-text search
    #[serde(default = "default_search_param")]
    pub search: String,
    /// Category filter
    #[serde(default = "default_category_param")]
    pub category: String,
    /// Strategy type filter
    #[serde(default = "default_strategy_type_param")]
    pub strategy_type: String,
    /// Sort field
    #[serde(default = "default_sort_by_param")]
    pub sort_by: String,
    /// Sort direction
    #[serde(default = "default_sort_order_param")]
    pub sort_order: String,
    /// 1-based page number
    #[serde(default = "default_page_param")]
    pub page: String,
    /// Page size
    #[serde(default = "default_page_size_param")]
    pub page_size: String,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            search: default_search_param(),
            category: default_category_param(),
            strategy_type: default_strategy_type_param(),
            sort_by: default_sort_by_param(),
            sort_order: default_sort_order_param(),
            page: default_page_param(),
            page_size: default_page_size_param(),
        }
    }
}

impl QueryParams {
    /// All names with the config key they belong to
    pub fn named(&self) -> [(&'static str, &str); 7] {
        [
            ("search", self.search.as_str()),
            ("category", self.category.as_str()),
            ("strategy_type", self.strategy_type.as_str()),
            ("sort_by", self.sort_by.as_str()),
            ("sort_order", self.sort_order.as_str()),
            ("page", self.page.as_str()),
            ("page_size", self.page_size.as_str()),
        ]
    }
}

fn default_search_param() -> String {
    "search".to_string()
}

fn default_category_param() -> String {
    "category".to_string()
}

fn default_strategy_type_param() -> String {
    "strategyType".to_string()
}

fn default_sort_by_param() -> String {
    "sortBy".to_string()
}

fn default_sort_order_param() -> String {
    "sortOrder".to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_page_size_param() -> String {
    "pageSize".to_string()
}

/// Paths into the list response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePaths {
    /// JSONPath selecting the items
    #[serde(default = "default_items_path")]
    pub items_path: String,
    /// Dotted path of the total count
    #[serde(default = "default_total_path")]
    pub total_path: String,
}

impl Default for ResponsePaths {
    fn default() -> Self {
        Self {
            items_path: default_items_path(),
            total_path: default_total_path(),
        }
    }
}

fn default_items_path() -> String {
    "$.items[*]".to_string()
}

fn default_total_path() -> String {
    "total".to_string()
}

// ============================================================================
// HTTP
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries for transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// First backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Backoff ceiling in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Client-side rate limit (disabled when absent)
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            rate_limit: None,
        }
    }
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    200
}

fn default_max_backoff_ms() -> u64 {
    5_000
}

// ============================================================================
// List
// ============================================================================

/// List view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Items per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Quiet period before a typed search term is committed
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Distance from the bottom that loads the next page
    #[serde(default = "default_scroll_threshold_px")]
    pub scroll_threshold_px: f64,

    /// Criteria at mount and after "clear filters"
    #[serde(default)]
    pub defaults: FilterCriteria,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            scroll_threshold_px: default_scroll_threshold_px(),
            defaults: FilterCriteria::default(),
        }
    }
}

impl ListConfig {
    /// Search debounce as a duration
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn default_page_size() -> u32 {
    20
}

fn default_search_debounce_ms() -> u64 {
    400
}

fn default_scroll_threshold_px() -> f64 {
    DEFAULT_THRESHOLD_PX
}

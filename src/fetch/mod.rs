//! Fetch module
//!
//! Remote source of list pages.
//!
//! # Overview
//!
//! The fetch module provides:
//! - `PagedListFetcher` - Async trait the controller calls for each page
//! - `HttpPageFetcher` - Implementation over the strategy list API
//! - `StrategySummary` - The strategy card record shown by the dashboard

mod http;
mod types;

pub use http::{extract_items, extract_total, HttpPageFetcher};
pub use types::{BacktestMetrics, PagedListFetcher, StrategySummary};

//! Fetch types and traits

use crate::error::Result;
use crate::filter::FilterCriteria;
use crate::pagination::{ListItem, PageResponse};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source of list pages
#[async_trait]
pub trait PagedListFetcher<T>: Send + Sync {
    /// Fetch one 1-based page of items matching `criteria`
    async fn fetch(
        &self,
        criteria: &FilterCriteria,
        page: u32,
        page_size: u32,
    ) -> Result<PageResponse<T>>;
}

/// Strategy card as listed by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategySummary {
    /// Unique id
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub strategy_type: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Visible to other users
    #[serde(default)]
    pub shared: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Latest backtest results, if any
    #[serde(default)]
    pub metrics: Option<BacktestMetrics>,
}

impl ListItem for StrategySummary {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

/// Headline backtest numbers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestMetrics {
    /// Total return as a fraction (0.12 = 12%)
    #[serde(default)]
    pub total_return: Option<f64>,
    #[serde(default)]
    pub annual_return: Option<f64>,
    #[serde(default)]
    pub sharpe_ratio: Option<f64>,
    /// Largest peak-to-trough loss as a fraction
    #[serde(default)]
    pub max_drawdown: Option<f64>,
    #[serde(default)]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub trade_count: Option<u64>,
}

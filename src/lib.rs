// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Strategy Feed
//!
//! Incremental loading for a filterable, paginated strategy list.
//!
//! ## Features
//!
//! - **Debounced search**: keystrokes settle into one filter change
//! - **Immediate selections**: category, type and sort commit at once
//! - **Infinite scroll**: near-bottom detection requests the next page
//! - **Stale response protection**: every fetch is stamped with a generation
//!   and late answers for superseded filters are dropped
//! - **HTTP source**: retries, backoff and rate limiting over a YAML-configured API
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use strategy_feed::{
//!     load_config, HttpPageFetcher, ListController, ListSettings, StrategySummary,
//! };
//!
//! #[tokio::main]
//! async fn main() -> strategy_feed::Result<()> {
//!     let config = load_config("feed.yaml")?;
//!     let fetcher = HttpPageFetcher::<StrategySummary>::from_config(&config)?;
//!     let settings = ListSettings::from_config(&config.list);
//!     let list = ListController::spawn(Arc::new(fetcher), settings);
//!
//!     list.set_category("trend")?;
//!     let view = list.wait_until_settled().await?;
//!     println!("{} of {:?} strategies", view.items().len(), view.page.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   keystrokes / selections / scroll
//!                │
//! ┌──────────────┴──────────────────────────────────────────┐
//! │                    ListController task                   │
//! │  FilterState ──FilterChanged──▶ PaginationCoordinator    │
//! │  (Debouncer)                    (generation, status)     │
//! │  ScrollSentinel ──near bottom──▶ load_next_page          │
//! └──────────────┬───────────────────────────▲──────────────┘
//!     FetchRequest│                           │FetchOutcome
//!                ▼                           │
//!         PagedListFetcher ── HttpClient ────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Injectable time source
pub mod clock;

/// Trailing-edge debouncer
pub mod debounce;

/// Search and filter inputs
pub mod filter;

/// Generation-stamped pagination state machine
pub mod pagination;

/// Near-bottom scroll detection
pub mod scroll;

/// HTTP client with retry and rate limiting
pub mod http;

/// Remote page fetchers
pub mod fetch;

/// YAML configuration
pub mod config;

/// Async list controller
pub mod controller;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_config, load_config_from_str, FeedConfig};
pub use controller::{ListController, ListHandle, ListSettings, ListView};
pub use fetch::{HttpPageFetcher, PagedListFetcher, StrategySummary};
pub use filter::{FilterCriteria, SortOrder};
pub use pagination::{ListItem, LoadStatus, PaginationCoordinator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

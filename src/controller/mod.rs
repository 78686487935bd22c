//! Controller module
//!
//! Async driver that wires filters, pagination and scrolling to a fetcher.
//!
//! # Overview
//!
//! The controller module provides:
//! - `ListController` - Task owning all list state for one view
//! - `ListHandle` - Cloneable input side; publishes `ListView` snapshots
//! - `ListSettings` - Page size, search debounce, scroll threshold, defaults

mod actor;
mod handle;
mod types;

pub use actor::ListController;
pub use handle::ListHandle;
pub use types::{ListSettings, ListView};

#[cfg(test)]
mod tests;

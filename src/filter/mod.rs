//! Filter module
//!
//! Search box and discrete filter selections for a strategy list view.
//!
//! # Overview
//!
//! The filter module provides:
//! - `FilterCriteria` - Immutable, complete set of list filters
//! - `FilterState` - Input handlers that debounce free text and commit
//!   selections immediately, emitting one `FilterChanged` per settled change

mod state;
mod types;

pub use state::FilterState;
pub use types::{FilterChanged, FilterCriteria, SortOrder};

//! Controller types

use crate::config::ListConfig;
use crate::filter::FilterCriteria;
use crate::pagination::{LoadStatus, PageState};
use crate::scroll::DEFAULT_THRESHOLD_PX;
use std::time::Duration;

/// Behaviour of one list view
#[derive(Debug, Clone, PartialEq)]
pub struct ListSettings {
    /// Items per page
    pub page_size: u32,
    /// Quiet period before a typed search term is committed
    pub search_debounce: Duration,
    /// Distance from the bottom, in pixels, that loads the next page
    pub scroll_threshold: f64,
    /// Criteria at mount and after clearing filters
    pub defaults: FilterCriteria,
}

impl ListSettings {
    /// Settings from the `list` config section
    pub fn from_config(config: &ListConfig) -> Self {
        Self {
            page_size: config.page_size,
            search_debounce: config.search_debounce(),
            scroll_threshold: config.scroll_threshold_px,
            defaults: config.defaults.clone(),
        }
    }

    /// Builder: set the default criteria
    #[must_use]
    pub fn with_defaults(mut self, defaults: FilterCriteria) -> Self {
        self.defaults = defaults;
        self
    }

    /// Builder: set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Builder: set the search debounce
    #[must_use]
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search_debounce = delay;
        self
    }
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            search_debounce: Duration::from_millis(400),
            scroll_threshold: DEFAULT_THRESHOLD_PX,
            defaults: FilterCriteria::default(),
        }
    }
}

/// Everything a list view renders, published after every change
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    /// Pagination state
    pub page: PageState<T>,
    /// Criteria of the current generation
    pub criteria: FilterCriteria,
    /// Live search box contents
    pub search_input: String,
    /// A typed search term is waiting for its debounce
    pub search_pending: bool,
    /// Show the end-of-list marker
    pub end_marker: bool,
    /// The controller has stopped
    pub closed: bool,
}

impl<T> ListView<T> {
    /// Nothing in flight and no search waiting to commit
    pub fn is_settled(&self) -> bool {
        !self.page.status.is_busy() && !self.search_pending
    }

    /// Loaded to the end and nothing matched
    pub fn is_empty_result(&self) -> bool {
        self.page.status == LoadStatus::End && self.page.total == Some(0)
    }

    /// Loaded items
    pub fn items(&self) -> &[T] {
        &self.page.items
    }
}

//! Filter input state
//!
//! Free text goes through a [`Debouncer`]; category, type and sort selections
//! commit immediately. Every commit recomputes the whole [`FilterCriteria`]
//! and is suppressed when it equals the last emitted value.

use super::types::{FilterChanged, FilterCriteria, SortOrder};
use crate::clock::Clock;
use crate::debounce::Debouncer;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Holds the live search input and the committed filter selections
#[derive(Debug)]
pub struct FilterState {
    defaults: FilterCriteria,
    /// Echo of the search box, updated on every keystroke
    input: String,
    search_term: String,
    category: String,
    strategy_type: String,
    sort_by: String,
    sort_order: SortOrder,
    last_emitted: FilterCriteria,
    debouncer: Debouncer<String>,
    delay: Duration,
    disposed: bool,
}

impl FilterState {
    /// Create filter state at mount time
    ///
    /// `defaults` count as already emitted: the owner loads them directly.
    /// Their search term is trimmed like any committed term.
    pub fn new(mut defaults: FilterCriteria, delay: Duration, clock: Arc<dyn Clock>) -> Self {
        defaults.search_term = normalize_term(&defaults.search_term);
        Self {
            input: defaults.search_term.clone(),
            search_term: defaults.search_term.clone(),
            category: defaults.category.clone(),
            strategy_type: defaults.strategy_type.clone(),
            sort_by: defaults.sort_by.clone(),
            sort_order: defaults.sort_order,
            last_emitted: defaults.clone(),
            defaults,
            debouncer: Debouncer::new(clock),
            delay,
            disposed: false,
        }
    }

    /// Live search box contents
    pub fn search_input(&self) -> &str {
        &self.input
    }

    /// Last committed criteria
    pub fn criteria(&self) -> &FilterCriteria {
        &self.last_emitted
    }

    /// Criteria restored by [`FilterState::clear`]
    pub fn defaults(&self) -> &FilterCriteria {
        &self.defaults
    }

    /// Debounce delay for free text
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// When the pending search term settles
    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Whether a search term is waiting for its debounce deadline
    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Record a keystroke; commits later through [`FilterState::poll`]
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        if self.disposed {
            return;
        }
        let term = term.into();
        self.input.clone_from(&term);
        self.debouncer.schedule(term, self.delay);
    }

    /// Commit the search term if its quiet period has elapsed
    pub fn poll(&mut self) -> Option<FilterChanged> {
        let term = self.debouncer.poll()?;
        self.search_term = normalize_term(&term);
        self.commit()
    }

    /// Commit the pending search term immediately
    pub fn flush_search(&mut self) -> Option<FilterChanged> {
        let term = self.debouncer.flush()?;
        self.search_term = normalize_term(&term);
        self.commit()
    }

    /// Select a category
    pub fn set_category(&mut self, category: impl Into<String>) -> Option<FilterChanged> {
        if self.disposed {
            return None;
        }
        self.fold_pending_search();
        self.category = category.into();
        self.commit()
    }

    /// Select a strategy type
    pub fn set_strategy_type(&mut self, strategy_type: impl Into<String>) -> Option<FilterChanged> {
        if self.disposed {
            return None;
        }
        self.fold_pending_search();
        self.strategy_type = strategy_type.into();
        self.commit()
    }

    /// Select the sort field
    pub fn set_sort_by(&mut self, sort_by: impl Into<String>) -> Option<FilterChanged> {
        if self.disposed {
            return None;
        }
        self.fold_pending_search();
        self.sort_by = sort_by.into();
        self.commit()
    }

    /// Select the sort direction
    pub fn set_sort_order(&mut self, order: SortOrder) -> Option<FilterChanged> {
        if self.disposed {
            return None;
        }
        self.fold_pending_search();
        self.sort_order = order;
        self.commit()
    }

    /// Select sort field and direction in one commit
    pub fn set_sort(
        &mut self,
        sort_by: impl Into<String>,
        order: SortOrder,
    ) -> Option<FilterChanged> {
        if self.disposed {
            return None;
        }
        self.fold_pending_search();
        self.sort_by = sort_by.into();
        self.sort_order = order;
        self.commit()
    }

    /// Restore the defaults and drop any pending search term
    ///
    /// Returns the criteria to reset with. Unlike the setters this never
    /// suppresses: an explicit clear always resets the list.
    pub fn clear(&mut self) -> FilterCriteria {
        self.debouncer.cancel();
        let defaults = self.defaults.clone();
        self.input.clone_from(&defaults.search_term);
        self.search_term.clone_from(&defaults.search_term);
        self.category.clone_from(&defaults.category);
        self.strategy_type.clone_from(&defaults.strategy_type);
        self.sort_by.clone_from(&defaults.sort_by);
        self.sort_order = defaults.sort_order;
        self.last_emitted = defaults.clone();
        defaults
    }

    /// Cancel the debounce timer for good
    pub fn dispose(&mut self) {
        self.debouncer.dispose();
        self.disposed = true;
    }

    fn fold_pending_search(&mut self) {
        if let Some(term) = self.debouncer.flush() {
            self.search_term = normalize_term(&term);
        }
    }

    fn current(&self) -> FilterCriteria {
        FilterCriteria {
            search_term: self.search_term.clone(),
            category: self.category.clone(),
            strategy_type: self.strategy_type.clone(),
            sort_by: self.sort_by.clone(),
            sort_order: self.sort_order,
        }
    }

    fn commit(&mut self) -> Option<FilterChanged> {
        if self.disposed {
            return None;
        }
        let criteria = self.current();
        if criteria == self.last_emitted {
            debug!(?criteria, "Filter commit unchanged, not emitting");
            return None;
        }
        debug!(?criteria, "Filter changed");
        self.last_emitted = criteria.clone();
        Some(FilterChanged { criteria })
    }
}

fn normalize_term(term: &str) -> String {
    term.trim().to_string()
}

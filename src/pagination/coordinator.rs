//! Pagination coordinator
//!
//! Owns page index, loaded items, total and status for one list view.

use super::types::{
    compute_has_more, Applied, DiscardReason, FetchOutcome, FetchRequest, ListEvent, ListItem,
    LoadError, LoadPhase, LoadStatus, PageResponse, PageState,
};
use crate::filter::FilterCriteria;
use std::collections::HashSet;
use std::fmt;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 64;

/// Generation-stamped state machine for an incrementally loaded list
///
/// No fetch is ever cancelled. Superseded requests simply carry an old
/// generation and are discarded by [`PaginationCoordinator::apply`].
pub struct PaginationCoordinator<T: ListItem> {
    state: PageState<T>,
    criteria: FilterCriteria,
    seen: HashSet<T::Id>,
    /// Outstanding request of the current generation
    awaiting: Option<FetchRequest>,
    disposed: bool,
    events: broadcast::Sender<ListEvent>,
}

impl<T: ListItem> PaginationCoordinator<T> {
    /// Create an empty coordinator; a `page_size` of 0 is treated as 1
    pub fn new(page_size: u32, criteria: FilterCriteria) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: PageState::empty(page_size.max(1)),
            criteria,
            seen: HashSet::new(),
            awaiting: None,
            disposed: false,
            events,
        }
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Start a new generation for `criteria` and request its first page
    ///
    /// Callable from any state. Whatever was in flight is orphaned by the
    /// generation bump.
    pub fn load_first_page(&mut self, criteria: FilterCriteria) -> Option<FetchRequest> {
        if self.disposed {
            return None;
        }
        self.criteria = criteria;
        self.state.generation += 1;
        self.state.page = 1;
        self.state.items.clear();
        self.seen.clear();
        self.state.total = None;
        self.state.has_more = true;
        self.state.last_error = None;

        info!(
            generation = self.state.generation,
            criteria = ?self.criteria,
            "Resetting list"
        );
        self.emit(ListEvent::Reset {
            generation: self.state.generation,
            criteria: self.criteria.clone(),
        });
        self.set_status(LoadStatus::LoadingFirst);
        Some(self.issue(1))
    }

    /// Restart from the first page with the current criteria
    pub fn reset(&mut self) -> Option<FetchRequest> {
        let criteria = self.criteria.clone();
        self.load_first_page(criteria)
    }

    /// Request the next page
    ///
    /// No-op unless the list is `Idle` with more pages available, which
    /// keeps at most one fetch outstanding per generation.
    pub fn load_next_page(&mut self) -> Option<FetchRequest> {
        if self.disposed {
            return None;
        }
        if self.state.status != LoadStatus::Idle || !self.state.has_more || self.state.page == 0 {
            debug!(
                status = %self.state.status,
                has_more = self.state.has_more,
                "Ignoring load_next_page"
            );
            return None;
        }
        self.state.last_error = None;
        self.set_status(LoadStatus::LoadingMore);
        Some(self.issue(self.state.page + 1))
    }

    /// Retry the last failed fetch under the current generation
    pub fn retry(&mut self) -> Option<FetchRequest> {
        if self.disposed {
            return None;
        }
        match self.state.status {
            LoadStatus::Error => {
                self.state.last_error = None;
                self.set_status(LoadStatus::LoadingFirst);
                Some(self.issue(1))
            }
            LoadStatus::Idle
                if self
                    .state
                    .last_error
                    .as_ref()
                    .is_some_and(|e| e.phase == LoadPhase::NextPage) =>
            {
                self.load_next_page()
            }
            _ => None,
        }
    }

    /// Dismiss a load-more notice
    pub fn dismiss_error(&mut self) {
        if self.state.status != LoadStatus::Error {
            self.state.last_error = None;
        }
    }

    /// Feed back a completed fetch
    pub fn apply(&mut self, outcome: FetchOutcome<T>) -> Applied {
        if self.disposed {
            return Applied::Discarded(DiscardReason::Disposed);
        }

        let FetchOutcome { request, result } = outcome;
        if request.generation != self.state.generation {
            debug!(
                fetched = request.generation,
                current = self.state.generation,
                page = request.page,
                "Discarding stale response"
            );
            return Applied::Discarded(DiscardReason::StaleGeneration {
                fetched: request.generation,
                current: self.state.generation,
            });
        }

        let matches = self
            .awaiting
            .as_ref()
            .is_some_and(|awaiting| awaiting.page == request.page);
        if !matches {
            debug!(page = request.page, "Discarding response nobody is waiting for");
            return Applied::Discarded(DiscardReason::NotAwaiting);
        }
        self.awaiting = None;

        match (self.state.status, result) {
            (LoadStatus::LoadingFirst, Ok(response)) => self.merge_page(response, true),
            (LoadStatus::LoadingMore, Ok(response)) => self.merge_page(response, false),
            (LoadStatus::LoadingFirst, Err(err)) => {
                let error = LoadError::from_error(LoadPhase::FirstPage, &err);
                warn!(generation = self.state.generation, error = %err, "First page failed");
                self.state.last_error = Some(error.clone());
                self.set_status(LoadStatus::Error);
                self.emit(ListEvent::Notice {
                    generation: self.state.generation,
                    error: error.clone(),
                });
                Applied::Failed(error)
            }
            (LoadStatus::LoadingMore, Err(err)) => {
                let error = LoadError::from_error(LoadPhase::NextPage, &err);
                warn!(
                    generation = self.state.generation,
                    page = request.page,
                    error = %err,
                    "Loading more failed"
                );
                self.state.last_error = Some(error.clone());
                self.set_status(LoadStatus::Idle);
                self.emit(ListEvent::Notice {
                    generation: self.state.generation,
                    error: error.clone(),
                });
                Applied::Failed(error)
            }
            _ => Applied::Discarded(DiscardReason::NotAwaiting),
        }
    }

    /// Make every later call a no-op
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.awaiting = None;
    }

    /// Subscribe to list events
    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Loaded items
    pub fn items(&self) -> &[T] {
        &self.state.items
    }

    /// Current status
    pub fn status(&self) -> LoadStatus {
        self.state.status
    }

    /// First page in flight
    pub fn is_loading(&self) -> bool {
        self.state.status == LoadStatus::LoadingFirst
    }

    /// Follow-up page in flight
    pub fn is_loading_more(&self) -> bool {
        self.state.status == LoadStatus::LoadingMore
    }

    /// All items loaded
    pub fn is_end(&self) -> bool {
        self.state.status == LoadStatus::End
    }

    /// Loaded to the end and nothing matched
    pub fn is_empty_result(&self) -> bool {
        self.is_end() && self.state.total == Some(0)
    }

    /// Last failure
    pub fn error(&self) -> Option<&LoadError> {
        self.state.last_error.as_ref()
    }

    /// Whether more pages exist
    pub fn has_more(&self) -> bool {
        self.state.has_more
    }

    /// Server-reported total
    pub fn total(&self) -> Option<u64> {
        self.state.total
    }

    /// Current page number
    pub fn page(&self) -> u32 {
        self.state.page
    }

    /// Items per page
    pub fn page_size(&self) -> u32 {
        self.state.page_size
    }

    /// Current generation
    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    /// Criteria of the current generation
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Outstanding request of the current generation
    pub fn awaiting(&self) -> Option<&FetchRequest> {
        self.awaiting.as_ref()
    }

    /// Whether [`PaginationCoordinator::dispose`] was called
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Borrow the full state
    pub fn state(&self) -> &PageState<T> {
        &self.state
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn issue(&mut self, page: u32) -> FetchRequest {
        let request = FetchRequest {
            generation: self.state.generation,
            criteria: self.criteria.clone(),
            page,
            page_size: self.state.page_size,
        };
        debug!(generation = request.generation, page, "Issuing fetch");
        self.awaiting = Some(request.clone());
        request
    }

    fn merge_page(&mut self, response: PageResponse<T>, replace: bool) -> Applied {
        let PageResponse { mut items, total } = response;
        let page_size = self.state.page_size as usize;
        if items.len() > page_size {
            warn!(
                received = items.len(),
                page_size, "Server returned more items than requested, truncating"
            );
            items.truncate(page_size);
        }
        let page_len = items.len();

        if replace {
            self.state.items.clear();
            self.seen.clear();
        } else {
            self.state.page += 1;
        }

        let mut added = 0;
        for item in items {
            if self.seen.insert(item.id()) {
                self.state.items.push(item);
                added += 1;
            }
        }
        if added < page_len {
            debug!(duplicates = page_len - added, "Skipped duplicate items");
        }

        self.state.total = Some(total);
        let has_more = compute_has_more(
            self.state.items.len(),
            total,
            page_len,
            self.state.page_size,
        );
        self.state.has_more = has_more;

        info!(
            generation = self.state.generation,
            page = self.state.page,
            added,
            loaded = self.state.items.len(),
            total,
            "Page loaded"
        );
        self.emit(ListEvent::PageLoaded {
            generation: self.state.generation,
            page: self.state.page,
            added,
            loaded: self.state.items.len(),
            total,
        });
        self.set_status(if has_more {
            LoadStatus::Idle
        } else {
            LoadStatus::End
        });

        Applied::Loaded { added, has_more }
    }

    fn set_status(&mut self, status: LoadStatus) {
        if self.state.status == status {
            return;
        }
        self.state.status = status;
        self.emit(ListEvent::StatusChanged {
            generation: self.state.generation,
            status,
        });
    }

    fn emit(&self, event: ListEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}

impl<T: ListItem + Clone> PaginationCoordinator<T> {
    /// Clone the full state
    pub fn snapshot(&self) -> PageState<T> {
        self.state.clone()
    }
}

impl<T: ListItem> fmt::Debug for PaginationCoordinator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginationCoordinator")
            .field("generation", &self.state.generation)
            .field("page", &self.state.page)
            .field("items", &self.state.items.len())
            .field("total", &self.state.total)
            .field("status", &self.state.status)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

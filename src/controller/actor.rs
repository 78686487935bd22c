//! List controller task
//!
//! One task owns the filter state, the pagination coordinator, the scroll
//! sentinel and every in-flight fetch. User commands, fetch completions and
//! the search debounce deadline are multiplexed with `tokio::select!`, so
//! state is only ever touched from this task.

use super::handle::ListHandle;
use super::types::{ListSettings, ListView};
use crate::clock::{Clock, TokioClock};
use crate::fetch::PagedListFetcher;
use crate::filter::{FilterChanged, FilterState, SortOrder};
use crate::pagination::{Applied, FetchOutcome, FetchRequest, ListItem, PaginationCoordinator};
use crate::scroll::{ScrollMetrics, ScrollSentinel};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

/// Requests sent from a [`ListHandle`] to its controller
#[derive(Debug)]
pub(crate) enum Command {
    SetSearchTerm(String),
    FlushSearch,
    SetCategory(String),
    SetStrategyType(String),
    SetSort { sort_by: String, order: SortOrder },
    ClearFilters,
    Scrolled(ScrollMetrics),
    LoadNextPage,
    Reset,
    Retry,
    DismissError,
    /// Answered once every earlier command has been handled
    Sync(oneshot::Sender<()>),
    Dispose,
}

type InFlight<T> = FuturesUnordered<BoxFuture<'static, FetchOutcome<T>>>;

/// Drives one incrementally loaded list
pub struct ListController<T: ListItem> {
    fetcher: Arc<dyn PagedListFetcher<T>>,
    filters: FilterState,
    pagination: PaginationCoordinator<T>,
    sentinel: ScrollSentinel,
    in_flight: InFlight<T>,
    commands: mpsc::UnboundedReceiver<Command>,
    view: watch::Sender<ListView<T>>,
}

impl<T> ListController<T>
where
    T: ListItem + Clone + Send + Sync + 'static,
    T::Id: Send + Sync,
{
    /// Start a controller on the current tokio runtime
    ///
    /// The first page for `settings.defaults` is requested immediately.
    pub fn spawn(fetcher: Arc<dyn PagedListFetcher<T>>, settings: ListSettings) -> ListHandle<T> {
        Self::spawn_with_clock(fetcher, settings, Arc::new(TokioClock))
    }

    /// Start a controller reading debounce time from `clock`
    ///
    /// The debounce deadline is awaited with the tokio timer, so `clock`
    /// must agree with `tokio::time::Instant`.
    pub fn spawn_with_clock(
        fetcher: Arc<dyn PagedListFetcher<T>>,
        settings: ListSettings,
        clock: Arc<dyn Clock>,
    ) -> ListHandle<T> {
        let ListSettings {
            page_size,
            search_debounce,
            scroll_threshold,
            defaults,
        } = settings;

        let filters = FilterState::new(defaults, search_debounce, clock);
        let defaults = filters.defaults().clone();
        let pagination = PaginationCoordinator::new(page_size, defaults.clone());
        let events = pagination.subscribe();
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (view, view_rx) = watch::channel(ListView {
            page: pagination.snapshot(),
            criteria: defaults,
            search_input: String::new(),
            search_pending: false,
            end_marker: false,
            closed: false,
        });

        let mut controller = Self {
            fetcher,
            filters,
            pagination,
            sentinel: ScrollSentinel::new(scroll_threshold),
            in_flight: FuturesUnordered::new(),
            commands,
            view,
        };
        let request = controller
            .pagination
            .load_first_page(controller.filters.criteria().clone());
        let _ = controller.issue(request);
        controller.publish();

        tokio::spawn(controller.run());
        ListHandle::new(command_tx, view_rx, events)
    }

    async fn run(mut self) {
        info!(criteria = ?self.pagination.criteria(), "List controller started");
        loop {
            let deadline = self.filters.deadline();
            let changed = tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Dispose) | None => break,
                    Some(command) => self.handle(command),
                },
                Some(outcome) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.complete(outcome)
                }
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(change) = self.filters.poll() {
                        self.apply_filters(change);
                    }
                    true
                }
            };
            if changed {
                self.publish();
            }
        }
        self.shutdown();
    }

    /// Returns whether the published view may have changed
    fn handle(&mut self, command: Command) -> bool {
        debug!(?command, "Handling command");
        match command {
            Command::SetSearchTerm(term) => {
                self.filters.set_search_term(term);
                true
            }
            Command::FlushSearch => {
                let pending = self.filters.has_pending_search();
                let change = self.filters.flush_search();
                self.apply_change(change) || pending
            }
            Command::SetCategory(category) => {
                let pending = self.filters.has_pending_search();
                let change = self.filters.set_category(category);
                self.apply_change(change) || pending
            }
            Command::SetStrategyType(strategy_type) => {
                let pending = self.filters.has_pending_search();
                let change = self.filters.set_strategy_type(strategy_type);
                self.apply_change(change) || pending
            }
            Command::SetSort { sort_by, order } => {
                let pending = self.filters.has_pending_search();
                let change = self.filters.set_sort(sort_by, order);
                self.apply_change(change) || pending
            }
            Command::ClearFilters => {
                let criteria = self.filters.clear();
                self.apply_filters(FilterChanged { criteria });
                true
            }
            Command::Scrolled(metrics) => {
                if self.sentinel.observe(metrics) {
                    let request = self.pagination.load_next_page();
                    self.issue(request)
                } else {
                    false
                }
            }
            Command::LoadNextPage => {
                let request = self.pagination.load_next_page();
                self.issue(request)
            }
            Command::Reset => {
                self.sentinel.reset();
                let request = self.pagination.reset();
                self.issue(request)
            }
            Command::Retry => {
                let request = self.pagination.retry();
                self.issue(request)
            }
            Command::DismissError => {
                let had_error = self.pagination.error().is_some();
                self.pagination.dismiss_error();
                had_error
            }
            Command::Sync(reply) => {
                let _ = reply.send(());
                false
            }
            Command::Dispose => false,
        }
    }

    fn apply_change(&mut self, change: Option<FilterChanged>) -> bool {
        match change {
            Some(change) => {
                self.apply_filters(change);
                true
            }
            None => false,
        }
    }

    fn apply_filters(&mut self, change: FilterChanged) {
        self.sentinel.reset();
        let request = self.pagination.load_first_page(change.criteria);
        self.issue(request);
    }

    fn issue(&mut self, request: Option<FetchRequest>) -> bool {
        let Some(request) = request else {
            return false;
        };
        let fetcher = Arc::clone(&self.fetcher);
        self.in_flight.push(Box::pin(async move {
            let result = fetcher
                .fetch(&request.criteria, request.page, request.page_size)
                .await;
            FetchOutcome { request, result }
        }));
        true
    }

    fn complete(&mut self, outcome: FetchOutcome<T>) -> bool {
        let applied = self.pagination.apply(outcome);
        if let Applied::Discarded(reason) = &applied {
            debug!(?reason, "Fetch completion discarded");
            return false;
        }
        if self.pagination.is_end() {
            self.sentinel.mark_end();
        }
        true
    }

    fn publish(&self) {
        let view = ListView {
            page: self.pagination.snapshot(),
            criteria: self.pagination.criteria().clone(),
            search_input: self.filters.search_input().to_string(),
            search_pending: self.filters.has_pending_search(),
            end_marker: self.sentinel.shows_end_marker() && !self.pagination.is_empty_result(),
            closed: false,
        };
        self.view.send_replace(view);
    }

    fn shutdown(mut self) {
        self.filters.dispose();
        let dropped = self.in_flight.len();
        self.in_flight.clear();
        self.pagination.dispose();
        self.view.send_modify(|view| view.closed = true);
        info!(dropped, "List controller stopped");
    }
}

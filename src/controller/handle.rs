//! Handle to a running list controller

use super::actor::Command;
use super::types::ListView;
use crate::error::{Error, Result};
use crate::filter::SortOrder;
use crate::pagination::ListEvent;
use crate::scroll::ScrollMetrics;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Input side and observable state of one list view
///
/// Cloning a handle shares the controller. Calls made after
/// [`ListHandle::dispose`] fail with [`Error::ListClosed`].
pub struct ListHandle<T> {
    commands: mpsc::UnboundedSender<Command>,
    view: watch::Receiver<ListView<T>>,
    events: broadcast::Receiver<ListEvent>,
    disposed: Arc<AtomicBool>,
}

impl<T> ListHandle<T> {
    pub(crate) fn new(
        commands: mpsc::UnboundedSender<Command>,
        view: watch::Receiver<ListView<T>>,
        events: broadcast::Receiver<ListEvent>,
    ) -> Self {
        Self {
            commands,
            view,
            events,
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Echo a keystroke in the search box; commits after the debounce
    pub fn set_search_term(&self, term: impl Into<String>) -> Result<()> {
        self.send(Command::SetSearchTerm(term.into()))
    }

    /// Commit the typed search term now
    pub fn flush_search(&self) -> Result<()> {
        self.send(Command::FlushSearch)
    }

    /// Select a category ("" for all)
    pub fn set_category(&self, category: impl Into<String>) -> Result<()> {
        self.send(Command::SetCategory(category.into()))
    }

    /// Select a strategy type ("" for all)
    pub fn set_strategy_type(&self, strategy_type: impl Into<String>) -> Result<()> {
        self.send(Command::SetStrategyType(strategy_type.into()))
    }

    /// Select sort field and direction
    pub fn set_sort(&self, sort_by: impl Into<String>, order: SortOrder) -> Result<()> {
        self.send(Command::SetSort {
            sort_by: sort_by.into(),
            order,
        })
    }

    /// Restore the default filters and reload
    pub fn clear_filters(&self) -> Result<()> {
        self.send(Command::ClearFilters)
    }

    /// Report a scroll or resize of the list viewport
    pub fn scrolled(&self, metrics: ScrollMetrics) -> Result<()> {
        self.send(Command::Scrolled(metrics))
    }

    /// Request the next page
    pub fn load_next_page(&self) -> Result<()> {
        self.send(Command::LoadNextPage)
    }

    /// Reload from the first page with the current filters
    pub fn reset(&self) -> Result<()> {
        self.send(Command::Reset)
    }

    /// Retry the last failed fetch
    pub fn retry(&self) -> Result<()> {
        self.send(Command::Retry)
    }

    /// Dismiss a load-more notice
    pub fn dismiss_error(&self) -> Result<()> {
        self.send(Command::DismissError)
    }

    /// Stop the controller
    ///
    /// Cancels the search debounce and drops in-flight fetches. Idempotent.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            let _ = self.commands.send(Command::Dispose);
        }
    }

    /// Whether the controller is gone
    pub fn is_closed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst) || self.commands.is_closed()
    }

    /// Subscribe to pagination events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.resubscribe()
    }

    fn send(&self, command: Command) -> Result<()> {
        if self.disposed.load(Ordering::SeqCst) {
            return Err(Error::ListClosed);
        }
        self.commands.send(command).map_err(|_| Error::ListClosed)
    }

    /// Resolves once every command sent before it has been handled
    async fn sync(&self) -> Result<()> {
        let (reply, done) = oneshot::channel();
        self.send(Command::Sync(reply))?;
        done.await.map_err(|_| Error::ListClosed)
    }
}

impl<T: Clone> ListHandle<T> {
    /// Latest published view
    pub fn view(&self) -> ListView<T> {
        self.view.borrow().clone()
    }

    /// Wait for the next published view
    pub async fn changed(&mut self) -> Result<ListView<T>> {
        self.view.changed().await.map_err(|_| Error::ListClosed)?;
        Ok(self.view.borrow_and_update().clone())
    }

    /// Wait until nothing is loading and no search term is pending
    ///
    /// Commands sent before this call are taken into account.
    pub async fn wait_until_settled(&self) -> Result<ListView<T>> {
        self.sync().await?;
        let mut view = self.view.clone();
        loop {
            {
                let current = view.borrow_and_update();
                if current.closed {
                    return Err(Error::ListClosed);
                }
                if current.is_settled() {
                    return Ok(current.clone());
                }
            }
            view.changed().await.map_err(|_| Error::ListClosed)?;
        }
    }
}

impl<T> Clone for ListHandle<T> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            view: self.view.clone(),
            events: self.events.resubscribe(),
            disposed: Arc::clone(&self.disposed),
        }
    }
}

impl<T> fmt::Debug for ListHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListHandle")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

//! Debouncing of rapidly changing values
//!
//! A [`Debouncer`] keeps the most recently scheduled value together with a
//! deadline. The owner polls it from its event loop (or sleeps until
//! [`Debouncer::deadline`]) and receives the value exactly once after the
//! input has been quiet for the requested delay.

use crate::clock::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Collapses a stream of values into one committed value after a quiet period
#[derive(Debug)]
pub struct Debouncer<T> {
    clock: Arc<dyn Clock>,
    pending: Option<Pending<T>>,
    disposed: bool,
}

impl<T> Debouncer<T> {
    /// Create a debouncer reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            pending: None,
            disposed: false,
        }
    }

    /// Replace the pending value and restart the timer
    pub fn schedule(&mut self, value: T, delay: Duration) {
        if self.disposed {
            return;
        }
        let deadline = self.clock.now() + delay;
        self.pending = Some(Pending { value, deadline });
    }

    /// Drop the pending value without emitting it
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Emit the pending value right away, if any
    pub fn flush(&mut self) -> Option<T> {
        if self.disposed {
            return None;
        }
        self.pending.take().map(|p| p.value)
    }

    /// Emit the pending value if its deadline has passed
    pub fn poll(&mut self) -> Option<T> {
        if self.disposed {
            return None;
        }
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| self.clock.now() >= p.deadline);
        if due {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Deadline of the pending value
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Whether a value is waiting to be emitted
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel and refuse all further scheduling
    pub fn dispose(&mut self) {
        self.pending = None;
        self.disposed = true;
    }

    /// Whether [`Debouncer::dispose`] has been called
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

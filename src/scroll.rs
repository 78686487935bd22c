//! Near-bottom detection for infinite scroll
//!
//! The sentinel is level-triggered: it reports a crossing on every qualifying
//! scroll or resize event. Duplicate fetches are prevented by
//! [`PaginationCoordinator::load_next_page`](crate::pagination::PaginationCoordinator::load_next_page),
//! which ignores calls while a page is in flight or the list has ended.

use serde::{Deserialize, Serialize};

/// Default distance from the bottom, in pixels, that triggers loading
pub const DEFAULT_THRESHOLD_PX: f64 = 200.0;

/// Geometry of a scrolled list viewport, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollMetrics {
    /// Distance scrolled from the top
    pub offset: f64,
    /// Visible height
    pub viewport: f64,
    /// Full height of the rendered list
    pub content: f64,
}

impl ScrollMetrics {
    /// Create scroll metrics
    pub fn new(offset: f64, viewport: f64, content: f64) -> Self {
        Self {
            offset,
            viewport,
            content,
        }
    }

    /// Pixels left below the viewport, never negative
    ///
    /// Content shorter than the viewport is at distance 0.
    pub fn distance_from_bottom(&self) -> f64 {
        (self.content - (self.offset + self.viewport)).max(0.0)
    }
}

/// Signals when the viewport gets close to the end of the list
#[derive(Debug, Clone)]
pub struct ScrollSentinel {
    threshold: f64,
    end_reached: bool,
}

impl ScrollSentinel {
    /// Create a sentinel; negative or non-finite thresholds use the default
    pub fn new(threshold: f64) -> Self {
        let threshold = if threshold.is_finite() && threshold >= 0.0 {
            threshold
        } else {
            DEFAULT_THRESHOLD_PX
        };
        Self {
            threshold,
            end_reached: false,
        }
    }

    /// Trigger distance in pixels
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether this scroll event should request the next page
    pub fn observe(&self, metrics: ScrollMetrics) -> bool {
        !self.end_reached && metrics.distance_from_bottom() <= self.threshold
    }

    /// The list has ended: stop signalling and show the end marker
    pub fn mark_end(&mut self) {
        self.end_reached = true;
    }

    /// Whether the end-of-list marker is shown
    pub fn shows_end_marker(&self) -> bool {
        self.end_reached
    }

    /// Clear end-of-list state for a new set of filters
    pub fn reset(&mut self) {
        self.end_reached = false;
    }
}

impl Default for ScrollSentinel {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD_PX)
    }
}

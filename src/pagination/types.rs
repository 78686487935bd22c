//! Pagination types and traits
//!
//! Defines the state, commands and outcomes exchanged with the coordinator.

use crate::error::{Error, Result};
use crate::filter::FilterCriteria;
use serde::Serialize;
use std::fmt;
use std::hash::Hash;

/// A list record with a unique identity
pub trait ListItem {
    /// Identity used for de-duplication across pages
    type Id: Eq + Hash + Clone + fmt::Debug;

    /// The record's id
    fn id(&self) -> Self::Id;
}

/// Status of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing in flight; more pages may be requested
    #[default]
    Idle,
    /// Waiting for the first page of the current generation
    LoadingFirst,
    /// Waiting for a follow-up page
    LoadingMore,
    /// The first page failed; the view shows an error with retry
    Error,
    /// Every item has been loaded
    End,
}

impl LoadStatus {
    /// Whether a fetch of the current generation is outstanding
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::LoadingFirst | Self::LoadingMore)
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::LoadingFirst => "loading_first",
            Self::LoadingMore => "loading_more",
            Self::Error => "error",
            Self::End => "end",
        };
        f.write_str(name)
    }
}

/// Which kind of fetch failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    /// First page: blocking
    FirstPage,
    /// Follow-up page: transient notice only
    NextPage,
}

/// A failed fetch as seen by the view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadError {
    /// Which fetch failed
    pub phase: LoadPhase,
    /// Human-readable cause
    pub message: String,
    /// Whether retrying may help
    pub retryable: bool,
}

impl LoadError {
    /// Capture a fetch error
    pub fn from_error(phase: LoadPhase, error: &Error) -> Self {
        Self {
            phase,
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }

    /// Whether the view must be replaced with an error state
    pub fn is_blocking(&self) -> bool {
        self.phase == LoadPhase::FirstPage
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A fetch the owner must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Generation the request was issued under
    pub generation: u64,
    /// Criteria to fetch with
    pub criteria: FilterCriteria,
    /// 1-based page number
    pub page: u32,
    /// Items per page
    pub page_size: u32,
}

/// One page returned by the remote list API
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T> {
    /// Items in server order
    pub items: Vec<T>,
    /// Total items matching the criteria
    pub total: u64,
}

impl<T> PageResponse<T> {
    /// Create a page response
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }
}

/// A completed fetch, tagged with the request that produced it
#[derive(Debug)]
pub struct FetchOutcome<T> {
    /// The request as issued
    pub request: FetchRequest,
    /// What the fetcher returned
    pub result: Result<PageResponse<T>>,
}

impl<T> FetchOutcome<T> {
    /// Successful completion
    pub fn success(request: FetchRequest, response: PageResponse<T>) -> Self {
        Self {
            request,
            result: Ok(response),
        }
    }

    /// Failed completion
    pub fn failure(request: FetchRequest, error: Error) -> Self {
        Self {
            request,
            result: Err(error),
        }
    }
}

/// Why a completion was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Issued under a superseded generation
    StaleGeneration {
        /// Generation captured by the request
        fetched: u64,
        /// Generation at completion time
        current: u64,
    },
    /// Current generation, but no matching request is outstanding
    NotAwaiting,
    /// The coordinator was disposed
    Disposed,
}

/// Result of feeding a completion to the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// A page was merged into the list
    Loaded {
        /// Items actually added after de-duplication
        added: usize,
        /// Whether more pages exist
        has_more: bool,
    },
    /// The fetch failed and the error was recorded
    Failed(LoadError),
    /// The completion had no effect
    Discarded(DiscardReason),
}

impl Applied {
    /// Whether the completion changed the list state
    pub fn is_applied(&self) -> bool {
        !matches!(self, Self::Discarded(_))
    }
}

/// Notifications published by the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// A new generation started from an empty list
    Reset {
        /// The new generation
        generation: u64,
        /// Criteria of the new generation
        criteria: FilterCriteria,
    },
    /// Status moved
    StatusChanged {
        /// Current generation
        generation: u64,
        /// New status
        status: LoadStatus,
    },
    /// A page was merged
    PageLoaded {
        /// Current generation
        generation: u64,
        /// Page number now loaded
        page: u32,
        /// Items added by this page
        added: usize,
        /// Items loaded in total
        loaded: usize,
        /// Total reported by the server
        total: u64,
    },
    /// A fetch failed; for follow-up pages this is a dismissible notice
    Notice {
        /// Current generation
        generation: u64,
        /// The failure
        error: LoadError,
    },
}

/// Snapshot of a list's pagination state
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    /// Current generation
    pub generation: u64,
    /// Highest page requested and loaded (1 while the first page loads, 0 at mount)
    pub page: u32,
    /// Items per page
    pub page_size: u32,
    /// Loaded items, unique by id, in insertion order
    pub items: Vec<T>,
    /// Total reported by the server, unknown until the first page arrives
    pub total: Option<u64>,
    /// Whether more pages exist
    pub has_more: bool,
    /// Current status
    pub status: LoadStatus,
    /// Last failure (blocking for the first page, a notice otherwise)
    pub last_error: Option<LoadError>,
}

impl<T> PageState<T> {
    /// Empty state at mount
    pub fn empty(page_size: u32) -> Self {
        Self {
            generation: 0,
            page: 0,
            page_size,
            items: Vec::new(),
            total: None,
            has_more: true,
            status: LoadStatus::Idle,
            last_error: None,
        }
    }
}

/// Whether pages remain after loading `loaded` of `total` items, the latest
/// page holding `last_page_len` items
pub fn compute_has_more(loaded: usize, total: u64, last_page_len: usize, page_size: u32) -> bool {
    (loaded as u64) < total && last_page_len >= page_size as usize
}

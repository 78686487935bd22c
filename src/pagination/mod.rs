//! Pagination module
//!
//! Incremental loading of a filterable, paginated list.
//!
//! # Overview
//!
//! `PaginationCoordinator` is a state machine over
//! `Idle | LoadingFirst | LoadingMore | Error | End`. It performs no I/O:
//! operations return the `FetchRequest` to issue, and completed fetches are
//! fed back through `apply`. Every request carries the generation it was
//! issued under, and a response is applied only if that generation is still
//! current, so out-of-order completions can never overwrite newer state.

mod coordinator;
mod types;

pub use coordinator::PaginationCoordinator;
pub use types::{
    compute_has_more, Applied, DiscardReason, FetchOutcome, FetchRequest, ListEvent, ListItem,
    LoadError, LoadPhase, LoadStatus, PageResponse, PageState,
};

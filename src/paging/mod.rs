//! # Paging Module
//!
//! Exhaustive retrieval of offset-paginated collections.
//!
//! A traversal requests fixed-size pages starting at offset 0 and appends every
//! page to the accumulator slot of its collection key until the number of
//! collected items reaches the total reported by the server. Pages are
//! requested strictly one after another, so items end up in exactly the order
//! the server returned them.
//!
//! ```text
//! begin(key) ──► page @0 ──► page @limit ──► ... ──► Done
//!                   │              │
//!                   └──── error ───┴──────────────► Failed
//! ```
//!
//! ## Building blocks
//!
//! - [`PageSource`] - capability to fetch one page of one collection
//! - [`Aggregator`] - runs traversals and owns the [`Accumulator`]
//! - [`Selection`] - restarts a dependent traversal whenever the selected
//!   key changes
//! - [`AuthContext`] - token and expiry, checked once when a traversal starts
//!
//! ## Stale responses
//!
//! Every traversal gets a fresh epoch. Starting a key again cancels the chain
//! that was running for it, and any page that chain still delivers is dropped
//! instead of being merged.

mod aggregator;
mod auth;
mod error;
mod page;
mod selection;
mod source;
mod traversal;

pub use aggregator::{Accumulator, Aggregator, Notice, TraversalState};
pub use auth::AuthContext;
pub use error::{AggregateError, FetchError};
pub use page::{FetchCursor, Page};
pub use selection::Selection;
pub use source::{FnSource, PageSource, source_fn};
pub use traversal::{CancelToken, DriftPolicy};

//! Coordination layer for the Inkstream client: rate-limit countdown,
//! paginated feed accumulation, and debounced tag autocomplete.
//!
//! Wraps the `inkstream_api` crate with the stateful controllers every
//! consumer shares. Nothing here renders anything; consumers subscribe to
//! state snapshots and draw them however they like.

pub mod error;
pub mod feed;
pub mod rate_limit;
pub mod tags;
pub mod timer;
pub mod validation;

pub use inkstream_api;
pub use inkstream_api::types;
pub use inkstream_api::{BlogQuery, Client, MyBlogsQuery, Query, TagSearchQuery};

pub use error::InkstreamError;
pub use feed::{FeedController, LoadOutcome};
pub use rate_limit::{RateLimitCoordinator, RateLimitState};
pub use tags::{Key, TagInputController, TagInputSnapshot};
pub use timer::Debouncer;

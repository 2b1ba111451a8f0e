//! Seam between the request layer and whatever owns rate-limit state.

/// Receiver for HTTP 429 notifications.
///
/// The client calls `on_rate_limited` exactly once per 429 response, before
/// returning [`Error::RateLimited`](crate::Error::RateLimited) to the caller.
/// `retry_after` carries the parsed integer `Retry-After` header, or `None`
/// when the server sent no usable value.
pub trait RateLimitSink: Send + Sync {
    fn on_rate_limited(&self, retry_after: Option<u64>);
}

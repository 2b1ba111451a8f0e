//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Transport failure or a response body that could not be decoded.
    #[error("Network error. Please try again.")]
    Network,
    /// The server answered HTTP 429. The registered rate-limit sink has
    /// already been notified by the time this value is returned.
    #[error("Too many requests. Please slow down and try again.")]
    RateLimited,
    /// A non-success status, or a 2xx envelope with `success: false`,
    /// carrying the server-supplied message.
    #[error("{message}")]
    Api { status: u16, message: String },
}

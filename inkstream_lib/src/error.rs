//! Error types for the coordination layer.

use std::fmt;

/// Errors produced by the coordination layer, wrapping upstream API errors
/// and adding caller-side input validation failures.
#[derive(Debug)]
pub enum InkstreamError {
    /// An error from the underlying API client.
    Api(inkstream_api::Error),
    /// Caller-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for InkstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for InkstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<inkstream_api::Error> for InkstreamError {
    fn from(e: inkstream_api::Error) -> Self {
        Self::Api(e)
    }
}

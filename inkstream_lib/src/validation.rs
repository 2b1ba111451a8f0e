//! Caller-side input validation. Rejections here never reach the network.

use crate::error::InkstreamError;

pub const MAX_TAG_LENGTH: usize = 30;
pub const MAX_SEARCH_LENGTH: usize = 50;
pub const MAX_SLUG_LENGTH: usize = 120;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, InkstreamError> {
    if input.len() > max_len {
        return Err(InkstreamError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(InkstreamError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a tag: enforce length, strip control chars, normalize to lowercase.
pub fn validate_tag(input: &str) -> Result<String, InkstreamError> {
    Ok(sanitize_text(input, MAX_TAG_LENGTH)?.to_lowercase())
}

/// Validate a tag search term: enforce length, strip control chars, trim.
pub fn validate_search(input: &str) -> Result<String, InkstreamError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Validate a post slug: lowercase ASCII alphanumerics and hyphens only.
pub fn validate_slug(input: &str) -> Result<String, InkstreamError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_SLUG_LENGTH {
        return Err(InkstreamError::InvalidInput(format!(
            "slug must be 1-{} bytes",
            MAX_SLUG_LENGTH
        )));
    }
    if trimmed
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        Ok(trimmed.to_string())
    } else {
        Err(InkstreamError::InvalidInput(format!(
            "invalid slug '{}'. Expected lowercase letters, digits and hyphens",
            trimmed
        )))
    }
}

/// Validate page number (must be >= 1).
pub fn validate_page(page: i64) -> Result<i64, InkstreamError> {
    if page < 1 {
        return Err(InkstreamError::InvalidInput(
            "page must be >= 1".to_string(),
        ));
    }
    Ok(page)
}

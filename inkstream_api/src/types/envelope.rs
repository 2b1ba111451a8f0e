use serde::{Deserialize, Serialize};

/// The server's uniform response wrapper.
///
/// Every endpoint answers with this shape; `data` carries the payload and
/// `pagination` is present on list endpoints only. A `success` of `false`
/// never coexists with a usable payload.
#[derive(Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    pub pagination: Option<Cursor>,
    pub errors: Option<serde_json::Value>,
    pub error: Option<serde_json::Value>,
}

impl<T> Envelope<T> {
    /// The server-supplied error text, preferring `message`, then `error`
    /// when it is a plain string, falling back to `Error: <status>`.
    pub fn error_message(&self, status: u16) -> String {
        if !self.message.is_empty() {
            return self.message.clone();
        }
        if let Some(serde_json::Value::String(text)) = &self.error {
            if !text.is_empty() {
                return text.clone();
            }
        }
        format!("Error: {}", status)
    }
}

/// Pagination metadata returned by list endpoints.
///
/// `pages` is trusted as sent by the server, never recomputed client-side.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Cursor {
    /// Cursor substituted when a list endpoint omits pagination: a single
    /// page holding everything it returned.
    pub fn fallback(page: i64, total: i64) -> Self {
        Self {
            page,
            limit: 10,
            total,
            pages: 1,
        }
    }
}

//! Per-call context passed through to handlers.

use chrono::Utc;
use uuid::Uuid;

/// Context for one service call.
///
/// The context is constructed by the host once per inbound call and
/// handed to the handler untouched. The log key correlates client-side
/// error reports with server-side log records: it is appended to every
/// client-visible error message and attached to every tracing event the
/// dispatcher emits.
///
/// # Example
///
/// ```
/// use gantry_core::CallContext;
///
/// let ctx = CallContext::new();
/// assert!(ctx.log_key().starts_with("LK["));
/// ```
#[derive(Debug, Clone)]
pub struct CallContext {
    request_id: Uuid,
    log_key: String,
}

impl CallContext {
    /// Creates a context with a fresh request id and log key.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: Uuid::now_v7(),
            log_key: format!("LK[{}]", Utc::now().format("%Y%m%d_%H%M%S_%6f")),
        }
    }

    /// Returns the request id.
    #[must_use]
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Returns the log key for this call.
    #[must_use]
    pub fn log_key(&self) -> &str {
        &self.log_key
    }

    /// Creates a context with a fixed log key, for tests.
    #[must_use]
    pub fn mock() -> Self {
        Self {
            request_id: Uuid::nil(),
            log_key: "LK[test]".to_string(),
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new()
    }
}

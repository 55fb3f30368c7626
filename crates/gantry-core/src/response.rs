//! The standard response envelope.
//!
//! Every service call answers with the same JSON shape, success or
//! failure, which keeps caller-side deserialization trivial:
//!
//! ```json
//! { "Count": 1, "ErrorCode": null, "ErrorMessage": null, "Values": [ ... ] }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ServiceError;

/// Uniform envelope wrapping both data and errors.
///
/// # Example
///
/// ```
/// use gantry_core::ServiceResponse;
/// use serde_json::json;
///
/// let response = ServiceResponse::ok(json!([1, 2, 3]));
/// assert_eq!(response.count, 3);
/// assert!(response.error_code.is_none());
///
/// let single = ServiceResponse::ok(json!({"name": "Ariane"}));
/// assert_eq!(single.count, 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceResponse {
    /// Number of values returned.
    pub count: usize,
    /// Wire error code, absent on success.
    pub error_code: Option<String>,
    /// Detailed error message, absent on success.
    pub error_message: Option<String>,
    /// The data returned.
    pub values: Vec<Value>,
}

impl ServiceResponse {
    /// Builds a success envelope from any JSON value.
    ///
    /// Arrays are flattened into `Values`, `null` yields an empty
    /// envelope, and anything else becomes a single-element array.
    #[must_use]
    pub fn ok(data: Value) -> Self {
        let values = match data {
            Value::Null => Vec::new(),
            Value::Array(items) => items,
            other => vec![other],
        };
        Self {
            count: values.len(),
            error_code: None,
            error_message: None,
            values,
        }
    }

    /// Builds a failure envelope from a [`ServiceError`].
    ///
    /// The message is the client-visible form: operation errors keep
    /// their text plus the log key line, fatal errors are sanitized.
    #[must_use]
    pub fn failure(error: &ServiceError, log_key: &str) -> Self {
        Self {
            count: 0,
            error_code: Some(error.code().to_string()),
            error_message: Some(error.client_message(log_key)),
            values: Vec::new(),
        }
    }

    /// Returns `true` if this envelope carries an error.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error_code.is_some()
    }
}

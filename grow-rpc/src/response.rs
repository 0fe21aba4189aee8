//! Procedure responses.
//!
//! Successful calls return the page as `application/json`. Failures return
//! an [RFC 7807](https://www.rfc-editor.org/rfc/rfc7807.html) problem
//! document as `application/problem+json`:
//!
//! ```json
//! {"detail":"limit must be between 1 and 100, got 0","field":"limit","status":400,"title":"Bad Request","type":"urn:problem:validation"}
//! ```

use miniserde::json::{self, Number, Value};

use crate::error::RpcError;
use crate::json::object;

/// JSON MIME type.
pub const MIME_JSON: &str = "application/json";

/// RFC 7807 Problem Details MIME type.
pub const MIME_PROBLEM_JSON: &str = "application/problem+json";

/// A serialized procedure response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value.
    pub content_type: &'static str,
    /// Serialized JSON body.
    pub body: String,
}

impl Response {
    /// `200 OK` with a JSON body.
    #[must_use]
    pub fn ok(body: &Value) -> Self {
        Self {
            status: 200,
            content_type: MIME_JSON,
            body: json::to_string(body),
        }
    }

    /// Problem document for `error`.
    #[must_use]
    pub fn problem(error: &RpcError) -> Self {
        let status = error.status();
        let mut doc = object([
            ("type", Value::String(error.problem_type().to_string())),
            ("title", Value::String(error.title().to_string())),
            ("status", Value::Number(Number::U64(u64::from(status)))),
            ("detail", Value::String(error.to_string())),
        ]);
        if let (Some(field), Value::Object(fields)) = (error.field(), &mut doc) {
            fields.insert("field".to_string(), Value::String(field.to_string()));
        }
        Self {
            status,
            content_type: MIME_PROBLEM_JSON,
            body: json::to_string(&doc),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parse the body back into a JSON value.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        json::from_str(&self.body).ok()
    }
}

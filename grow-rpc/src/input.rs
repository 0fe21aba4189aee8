//! Procedure input parsing.
//!
//! Input is a JSON object:
//!
//! ```json
//! {"limit": 12, "cursor": "eyJrIjoi...", "sortField": "name", "sortOrder": "asc",
//!  "filters": {"search": "kush"}}
//! ```
//!
//! - `cursor` may be an integer (page number) or a boundary token.
//! - Keys other than the pagination fields are legacy top-level filters
//!   (`{"filterNotConnected": true}`) and are merged into `filters`.
//! - `direction`, sent by infinite-query clients, is ignored.
//! - An empty body or `null` means "all defaults".
//!
//! Only shape is checked here. Whether a filter key or sort field exists is
//! decided by [`grow_feed::normalize`].

use grow_feed::{RawCursor, RawParams, Value};
use miniserde::json::{self, Number};
use thiserror::Error;

/// Why an input body was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum InputError {
    /// Body larger than the configured maximum.
    #[error("input of {len} bytes exceeds the {max} byte limit")]
    TooLarge {
        /// Body length.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Not valid JSON.
    #[error("input is not valid JSON")]
    InvalidJson,

    /// Valid JSON, but not an object or null.
    #[error("input must be a JSON object")]
    NotAnObject,

    /// A field of the wrong JSON type.
    #[error("'{field}' must be {expected}")]
    FieldType {
        /// Offending field, `filters.<key>` for filter values.
        field: String,
        /// Expected JSON type.
        expected: &'static str,
    },
}

impl InputError {
    /// Input field the error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldType { field, .. } => Some(field),
            Self::TooLarge { .. } | Self::InvalidJson | Self::NotAnObject => None,
        }
    }

    fn field_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::FieldType {
            field: field.into(),
            expected,
        }
    }
}

/// Parsed procedure input.
#[derive(Debug, Clone, PartialEq)]
pub struct Input {
    /// Pagination parameters for the core.
    pub params: RawParams,
    /// Compact JSON with sorted keys; equal inputs give equal strings.
    pub canonical: String,
}

impl Input {
    /// Parse a request body of at most `max_size` bytes.
    pub fn parse(body: &str, max_size: usize) -> Result<Self, InputError> {
        if body.len() > max_size {
            return Err(InputError::TooLarge {
                len: body.len(),
                max: max_size,
            });
        }
        if body.trim().is_empty() {
            return Ok(Self::empty());
        }

        let value: json::Value = json::from_str(body).map_err(|_| InputError::InvalidJson)?;
        let object = match &value {
            json::Value::Null => return Ok(Self::empty()),
            json::Value::Object(object) => object,
            _ => return Err(InputError::NotAnObject),
        };

        let mut params = RawParams::default();
        let mut legacy = Vec::new();
        for (key, value) in object.iter() {
            match key.as_str() {
                "limit" => params.limit = integer(key, value)?,
                "page" => params.page = integer(key, value)?,
                "cursor" => params.cursor = cursor(value)?,
                "sortField" => params.sort_field = string(key, value)?,
                "sortOrder" => params.sort_order = string(key, value)?,
                "filters" => params.filters.extend(filters(value)?),
                "direction" => {},
                _ => legacy.push((key.clone(), filter_value(key, value)?)),
            }
        }
        params.filters.extend(legacy);

        Ok(Self {
            params,
            canonical: json::to_string(&value),
        })
    }

    fn empty() -> Self {
        Self {
            params: RawParams::default(),
            canonical: "{}".to_string(),
        }
    }
}

fn integer(field: &str, value: &json::Value) -> Result<Option<i64>, InputError> {
    match value {
        json::Value::Null => Ok(None),
        json::Value::Number(Number::I64(n)) => Ok(Some(*n)),
        // Out-of-range values are rejected downstream as limits or pages.
        json::Value::Number(Number::U64(n)) => Ok(Some(i64::try_from(*n).unwrap_or(i64::MAX))),
        _ => Err(InputError::field_type(field, "an integer")),
    }
}

fn string(field: &str, value: &json::Value) -> Result<Option<String>, InputError> {
    match value {
        json::Value::Null => Ok(None),
        json::Value::String(s) => Ok(Some(s.clone())),
        _ => Err(InputError::field_type(field, "a string")),
    }
}

fn cursor(value: &json::Value) -> Result<Option<RawCursor>, InputError> {
    match value {
        json::Value::String(token) => Ok(Some(RawCursor::Token(token.clone()))),
        other => Ok(integer("cursor", other)
            .map_err(|_| InputError::field_type("cursor", "an integer or a string"))?
            .map(RawCursor::Page)),
    }
}

fn filters(value: &json::Value) -> Result<Vec<(String, Value)>, InputError> {
    match value {
        json::Value::Null => Ok(Vec::new()),
        json::Value::Object(object) => object
            .iter()
            .map(|(key, value)| Ok((key.clone(), filter_value(&format!("filters.{key}"), value)?)))
            .collect(),
        _ => Err(InputError::field_type("filters", "an object")),
    }
}

fn filter_value(field: &str, value: &json::Value) -> Result<Value, InputError> {
    match value {
        json::Value::Null => Ok(Value::Null),
        json::Value::Bool(b) => Ok(Value::Bool(*b)),
        json::Value::String(s) => Ok(Value::String(s.clone())),
        json::Value::Number(Number::I64(n)) => Ok(Value::Int(*n)),
        json::Value::Number(Number::U64(n)) => i64::try_from(*n)
            .map(Value::Int)
            .map_err(|_| InputError::field_type(field, "a scalar")),
        json::Value::Number(Number::F64(f)) => Ok(Value::Float(*f)),
        json::Value::Array(_) | json::Value::Object(_) => Err(InputError::field_type(field, "a scalar")),
    }
}

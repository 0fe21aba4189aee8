//! Conversions between SQL parameter values and JSON values.

use miniserde::json::{self, Number};

use crate::builder::Value;

/// Convert a parameter value to JSON.
pub(crate) fn to_json(value: &Value) -> json::Value {
    match value {
        Value::Null => json::Value::Null,
        Value::Bool(b) => json::Value::Bool(*b),
        Value::Int(i) => json::Value::Number(Number::I64(*i)),
        Value::Float(f) => json::Value::Number(Number::F64(*f)),
        Value::String(s) => json::Value::String(s.clone()),
    }
}

/// Convert a JSON scalar to a parameter value. Arrays, objects and integers
/// beyond `i64` have no counterpart.
pub(crate) fn from_json(value: &json::Value) -> Option<Value> {
    match value {
        json::Value::Null => Some(Value::Null),
        json::Value::Bool(b) => Some(Value::Bool(*b)),
        json::Value::Number(Number::I64(i)) => Some(Value::Int(*i)),
        json::Value::Number(Number::U64(u)) => i64::try_from(*u).ok().map(Value::Int),
        json::Value::Number(Number::F64(f)) => Some(Value::Float(*f)),
        json::Value::String(s) => Some(Value::String(s.clone())),
        json::Value::Array(_) | json::Value::Object(_) => None,
    }
}

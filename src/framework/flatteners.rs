//! Wire → model helpers
//!
//! Absent or zero wire values become known-empty model values. The
//! `*_or_null` variants are the explicit exceptions for optional attributes.

use super::types::{BoolValue, StringSet, StringValue, Value};

pub fn string(value: impl Into<String>) -> StringValue {
    Value::Known(value.into())
}

/// Null when the wire value is empty
pub fn string_or_null(value: &str) -> StringValue {
    if value.is_empty() {
        Value::Null
    } else {
        Value::Known(value.to_string())
    }
}

/// Null when the wire field was absent
pub fn optional_string(value: Option<&String>) -> StringValue {
    match value {
        Some(v) => Value::Known(v.clone()),
        None => Value::Null,
    }
}

pub fn optional_bool(value: Option<bool>) -> BoolValue {
    match value {
        Some(v) => Value::Known(v),
        None => Value::Null,
    }
}

/// A known set, empty when the wire list was empty
pub fn string_set<I, S>(values: I) -> StringSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Known(values.into_iter().map(Into::into).collect())
}

/// Null when the wire list was absent
pub fn optional_string_set(values: Option<&Vec<String>>) -> StringSet {
    match values {
        Some(v) => string_set(v.iter().cloned()),
        None => Value::Null,
    }
}

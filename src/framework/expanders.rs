//! Model → wire helpers

use super::types::{BoolValue, StringSet, StringValue};

/// A string set as a plain vector; null expands to an empty vector
pub fn string_set(set: &StringSet) -> Vec<String> {
    set.as_known()
        .map(|values| values.iter().cloned().collect())
        .unwrap_or_default()
}

/// A string attribute as an optional wire field; null expands to `None`
pub fn optional_string(value: &StringValue) -> Option<String> {
    value.as_known().cloned()
}

pub fn optional_bool(value: &BoolValue) -> Option<bool> {
    value.as_known().copied()
}

/// A string set as an optional wire list; null expands to `None`
pub fn optional_string_set(set: &StringSet) -> Option<Vec<String>> {
    set.as_known().map(|values| values.iter().cloned().collect())
}

//! Attribute values
//!
//! Every attribute the host hands us is either null or a known value. A known
//! empty string is not the same thing as null.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<T> {
    Null,
    Known(T),
}

pub type StringValue = Value<String>;
pub type BoolValue = Value<bool>;
pub type StringSet = Value<BTreeSet<String>>;

impl<T> Default for Value<T> {
    fn default() -> Self {
        Self::Null
    }
}

impl<T> Value<T> {
    pub fn known(value: T) -> Self {
        Self::Known(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_known(&self) -> Option<&T> {
        match self {
            Self::Known(v) => Some(v),
            Self::Null => None,
        }
    }
}

impl Value<String> {
    /// The string, or `""` when null
    pub fn value_str(&self) -> &str {
        self.as_known().map(String::as_str).unwrap_or("")
    }

    pub fn value_string(&self) -> String {
        self.value_str().to_string()
    }
}

impl Value<bool> {
    /// The bool, or `false` when null
    pub fn value_bool(&self) -> bool {
        self.as_known().copied().unwrap_or(false)
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Self::Known(value.to_string())
    }
}

impl From<bool> for Value<bool> {
    fn from(value: bool) -> Self {
        Self::Known(value)
    }
}

impl<T: Serialize> Serialize for Value<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Known(v) => v.serialize(serializer),
            Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Value<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Self::Known(v),
            None => Self::Null,
        })
    }
}

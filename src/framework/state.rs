//! Plan and state values exchanged with the host
//!
//! The host stores each resource as a single JSON object. Handlers decode it
//! into their model with `get` and write the refreshed model back with
//! `set`; failures come back as diagnostics rather than errors.

use super::diag::Diagnostic;
use super::path::Path;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value as Json};

static NULL: Json = Json::Null;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    raw: Option<Json>,
}

/// Planned values share the state's representation
pub type Plan = State;

impl State {
    /// An empty state: nothing has been written yet
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an object value received from the host
    pub fn from_json(raw: Json) -> Self {
        if raw.is_null() {
            return Self::empty();
        }
        Self { raw: Some(raw) }
    }

    pub fn raw(&self) -> Option<&Json> {
        self.raw.as_ref()
    }

    pub fn into_json(self) -> Json {
        self.raw.unwrap_or(Json::Null)
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_none()
    }

    /// Decode the whole object into a model
    pub fn get<T: DeserializeOwned>(&self) -> Result<T, Diagnostic> {
        let Some(raw) = &self.raw else {
            return Err(Diagnostic::error(
                "Value Conversion Error",
                "Received an empty object value; expected a resource object.",
            ));
        };

        serde_json::from_value(raw.clone()).map_err(|e| {
            Diagnostic::error(
                "Value Conversion Error",
                format!("Could not decode object value into the resource model: {}", e),
            )
        })
    }

    /// Replace the whole object with an encoded model
    pub fn set<T: Serialize>(&mut self, value: &T) -> Result<(), Diagnostic> {
        let encoded = serde_json::to_value(value).map_err(|e| {
            Diagnostic::error(
                "Value Conversion Error",
                format!("Could not encode the resource model: {}", e),
            )
        })?;

        if !encoded.is_object() {
            return Err(Diagnostic::error(
                "Value Conversion Error",
                "Resource models must encode as objects.",
            ));
        }

        self.raw = Some(encoded);
        Ok(())
    }

    /// Decode a single attribute
    pub fn get_attribute<T: DeserializeOwned>(&self, path: &Path) -> Result<T, Diagnostic> {
        let mut current = self.raw.as_ref().unwrap_or(&NULL);
        for step in path.steps() {
            current = current.get(step).unwrap_or(&NULL);
        }

        serde_json::from_value(current.clone()).map_err(|e| {
            Diagnostic::error(
                "Value Conversion Error",
                format!("Could not decode attribute {}: {}", path, e),
            )
        })
    }

    /// Write a single attribute, creating intermediate objects as needed
    pub fn set_attribute<T: Serialize>(&mut self, path: &Path, value: T) -> Result<(), Diagnostic> {
        let encoded = serde_json::to_value(value).map_err(|e| {
            Diagnostic::error(
                "Value Conversion Error",
                format!("Could not encode attribute {}: {}", path, e),
            )
        })?;

        let Some((last, parents)) = path.steps().split_last() else {
            return Err(Diagnostic::error("Invalid Attribute Path", "Empty attribute path."));
        };

        let mut current = self.raw.get_or_insert_with(|| Json::Object(Map::new()));

        for step in parents {
            current = object_mut(current, path)?
                .entry(step.clone())
                .or_insert_with(|| Json::Object(Map::new()));
        }

        object_mut(current, path)?.insert(last.clone(), encoded);
        Ok(())
    }

    /// Drop the resource from state (after delete)
    pub fn remove_resource(&mut self) {
        self.raw = None;
    }
}

fn object_mut<'a>(value: &'a mut Json, path: &Path) -> Result<&'a mut Map<String, Json>, Diagnostic> {
    if value.is_null() {
        *value = Json::Object(Map::new());
    }
    value.as_object_mut().ok_or_else(|| {
        Diagnostic::error(
            "Invalid Attribute Path",
            format!("Cannot set {}: parent is not an object", path),
        )
    })
}

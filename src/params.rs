//! Workflow parameter marshaling.
//!
//! The host engine hands each runnable a named map of JSON values. This
//! module wraps that map with typed accessors so the runnables can read
//! optional filters, required configuration, and scalar-or-list parameters
//! without hand-rolled `Value` plumbing.
//!
//! Required reads never perform I/O, so a missing parameter always fails
//! before the runnable touches the metadata service.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{GenoflowError, Result};

/// Engine-owned parameters for a single pipeline step.
///
/// Parameters are transient: they live for one runnable invocation and are
/// repopulated by the engine for the next step from the emitted dataflow.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: HashMap<String, Value>,
}

impl Params {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a parameter map from JSON key/value pairs.
    pub fn from_map(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    /// Get a raw parameter value.
    ///
    /// Returns `None` when the parameter is absent or set to JSON null; the
    /// engine treats both identically.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.values.get(name) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    /// Whether a parameter is present and non-null.
    pub fn is_defined(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a parameter, replacing any previous value.
    pub fn set<T: Serialize>(&mut self, name: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Typed optional read.
    ///
    /// Absent and null both read as `None`. A present value of the wrong
    /// shape is a classified parameter error, not a silent `None`.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|source| GenoflowError::InvalidParam {
                    name: name.to_string(),
                    source,
                }),
        }
    }

    /// Scalar-or-list read.
    ///
    /// The engine lets pipeline authors pass either `"homo_sapiens"` or
    /// `["homo_sapiens", "mus_musculus"]` for list-shaped parameters; a bare
    /// scalar reads as a one-element list. Absent reads as an empty list.
    pub fn get_list<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        let value = match self.get(name) {
            None => return Ok(Vec::new()),
            Some(value) => value.clone(),
        };
        let value = match value {
            Value::Array(_) => value,
            scalar => Value::Array(vec![scalar]),
        };
        serde_json::from_value(value).map_err(|source| GenoflowError::InvalidParam {
            name: name.to_string(),
            source,
        })
    }

    /// Typed required read.
    ///
    /// Fails with [`GenoflowError::MissingParam`] when the parameter is
    /// absent or null.
    pub fn required<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        match self.get_as(name)? {
            Some(value) => Ok(value),
            None => Err(GenoflowError::MissingParam(name.to_string())),
        }
    }

    /// Required string read; an empty string counts as missing.
    pub fn required_str(&self, name: &str) -> Result<String> {
        let value: String = self.required(name)?;
        if value.is_empty() {
            return Err(GenoflowError::MissingParam(name.to_string()));
        }
        Ok(value)
    }
}

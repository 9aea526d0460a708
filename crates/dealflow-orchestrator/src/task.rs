//! Task payloads handed to agents.

use crate::error::AgentError;
use dealflow_core::record;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key under which a workflow injects the previous step's result.
pub const CONTEXT_KEY: &str = "context";

/// An open key-value task. Each agent declares which keys it requires.
///
/// Agents receive `&Task` and never mutate it; workflow context injection
/// produces a new task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task(Map<String, Value>);

impl Task {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns a copy carrying `context` under [`CONTEXT_KEY`].
    #[must_use]
    pub fn with_context(&self, context: Value) -> Self {
        self.clone().with(CONTEXT_KEY, context)
    }

    /// Whether every key in `keys` is present (null values count as present).
    #[must_use]
    pub fn has_keys(&self, keys: &[&str]) -> bool {
        keys.iter().all(|k| self.0.contains_key(*k))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String field; numbers are rendered.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<String> {
        record::get_string(&self.0, key)
    }

    /// Numeric field; numeric strings are accepted.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        record::get_f64(&self.0, key)
    }

    /// Deserializes a required field.
    ///
    /// # Errors
    /// Returns `AgentError::InvalidInput` if the key is absent or has the
    /// wrong shape.
    pub fn parse<T: DeserializeOwned>(&self, key: &str) -> Result<T, AgentError> {
        let value = self
            .0
            .get(key)
            .ok_or_else(|| AgentError::InvalidInput(format!("missing '{key}'")))?;
        serde_json::from_value(value.clone())
            .map_err(|e| AgentError::InvalidInput(format!("'{key}': {e}")))
    }

    /// Deserializes an optional field. Absent and null both yield `None`.
    ///
    /// # Errors
    /// Returns `AgentError::InvalidInput` if the value has the wrong shape.
    pub fn parse_optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AgentError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.parse(key).map(Some),
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Task {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Task {
    type Error = AgentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(AgentError::InvalidInput(format!("task must be a JSON object, got {other}"))),
        }
    }
}

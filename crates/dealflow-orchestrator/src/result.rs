//! Agent results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Agent-specific fields of a successful result.
pub type Payload = Map<String, Value>;

/// Envelope keys an agent payload may not override.
const RESERVED_KEYS: [&str; 7] =
    ["status", "agent", "execution_id", "timestamp", "error", "error_kind", "step_number"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Error,
}

/// Why a result is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Required task keys were missing; the agent never ran.
    Validation,
    /// No agent is registered under the requested name.
    NotFound,
    /// The agent ran and failed.
    Execution,
    /// The agent or one of its external calls exceeded its time limit.
    Timeout,
    /// The run was cancelled before completing.
    Cancelled,
}

/// The uniform result of one agent invocation.
///
/// A success never carries `error`/`error_kind`; an error always does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub status: ResultStatus,
    pub agent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// 1-based position when produced inside a workflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_number: Option<usize>,
    #[serde(flatten)]
    pub payload: Payload,
}

impl AgentResult {
    /// A successful result. Payload keys that collide with envelope fields are dropped.
    #[must_use]
    pub fn success(agent: impl Into<String>, execution_id: String, mut payload: Payload) -> Self {
        for key in RESERVED_KEYS {
            payload.remove(key);
        }
        Self {
            status: ResultStatus::Success,
            agent: agent.into(),
            execution_id: Some(execution_id),
            timestamp: Utc::now(),
            error: None,
            error_kind: None,
            step_number: None,
            payload,
        }
    }

    /// An error result with no payload.
    #[must_use]
    pub fn failure(agent: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: ResultStatus::Error,
            agent: agent.into(),
            execution_id: None,
            timestamp: Utc::now(),
            error: Some(message.into()),
            error_kind: Some(kind),
            step_number: None,
            payload: Payload::new(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Success
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }

    /// Tokens reported by the agent in its `tokens_used` field.
    #[must_use]
    pub fn tokens_used(&self) -> u64 {
        self.payload.get("tokens_used").and_then(Value::as_u64).unwrap_or(0)
    }

    /// The full wire shape as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

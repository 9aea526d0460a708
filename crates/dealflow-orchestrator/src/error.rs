// Error types for agents and orchestration

use crate::result::ErrorKind;
use dealflow_abstraction::GeneratorError;
use dealflow_core::ProviderError;
use thiserror::Error;

/// Result type for orchestration operations
pub type Result<T> = std::result::Result<T, OrchestrationError>;

/// Faults raised by agent logic. The execution wrapper turns every one of
/// these into an error result.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Task values present but unusable (wrong type, unknown mode)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Data provider failure
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Text generator failure
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// An external call or the whole execution ran out of time
    #[error("{operation} timed out after {after_ms} ms")]
    Timeout {
        /// What was being waited on
        operation: String,
        /// The limit that was exceeded
        after_ms: u64,
    },

    /// JSON error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Error kind recorded on the result.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            _ => ErrorKind::Execution,
        }
    }
}

/// Faults in the orchestration layer itself, outside any single agent.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    /// Agent lookup failed
    #[error("Agent '{0}' not found")]
    AgentNotFound(String),

    /// The previous step's result could not be injected as context
    #[error("Failed to inject context into step {step}: {reason}")]
    ContextInjection {
        /// 1-based step number
        step: usize,
        /// Underlying failure
        reason: String,
    },

    /// Workflow cancelled
    #[error("Workflow cancelled before step {before_step}")]
    Cancelled {
        /// 1-based step that was not started
        before_step: usize,
    },

    /// The workflow loop panicked outside any agent's execution
    #[error("Workflow panicked: {0}")]
    Panicked(String),

    /// Other error
    #[error("Orchestration error: {0}")]
    Other(String),
}

//! Helpers shared by the built-in agents.

use crate::error::AgentError;
use crate::executor::duration_ms;
use crate::result::Payload;
use dealflow_abstraction::{Generation, GenerationParameters, TextGenerator};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time;

/// Awaits an external call with a time limit.
pub(crate) async fn bounded<T, E, F>(operation: &str, limit: Duration, call: F) -> Result<T, AgentError>
where
    F: Future<Output = Result<T, E>>,
    AgentError: From<E>,
{
    match time::timeout(limit, call).await {
        Ok(result) => result.map_err(AgentError::from),
        Err(_) => Err(AgentError::Timeout {
            operation: operation.to_string(),
            after_ms: duration_ms(limit),
        }),
    }
}

/// Calls the generator with a time limit.
pub(crate) async fn draft(
    generator: &dyn TextGenerator,
    prompt: &str,
    parameters: GenerationParameters,
    limit: Duration,
) -> Result<Generation, AgentError> {
    let operation = format!("generator '{}'", generator.generator_id());
    bounded(&operation, limit, generator.generate(prompt, Some(parameters))).await
}

/// Serializes a payload struct into a JSON object.
pub(crate) fn to_payload<T: Serialize>(value: &T) -> Result<Payload, AgentError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AgentError::Other(format!("payload must be an object, got {other}"))),
    }
}

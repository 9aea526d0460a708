//! Agent execution wrapper.
//!
//! [`AgentExecutor::run`] is the only place agent faults are caught. It
//! validates the task, bounds execution by a timeout, converts errors and
//! panics into error results, and stamps successful results with an
//! execution id.

use crate::registry::RegisteredAgent;
use crate::result::{AgentResult, ErrorKind};
use crate::task::Task;
use chrono::Utc;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio::time;
use tracing::{debug, error, info, warn};

/// Message returned when required task keys are missing.
pub const VALIDATION_FAILED: &str = "Task validation failed";

/// Executor for running registered agents.
#[derive(Debug, Clone)]
pub struct AgentExecutor {
    /// Upper bound on a single `execute` call.
    timeout: Duration,
}

impl AgentExecutor {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs one agent on one task. Never panics and never returns a fault:
    /// every outcome is an [`AgentResult`].
    pub async fn run(&self, registered: &RegisteredAgent, task: &Task) -> AgentResult {
        let agent = registered.agent();
        let name = agent.name();

        if !agent.validate(task) {
            warn!(agent = %name, "Task validation failed");
            return AgentResult::failure(name, ErrorKind::Validation, VALIDATION_FAILED);
        }

        let count = registered.record_execution();
        debug!(agent = %name, execution = count, "Executing agent");

        let started = Instant::now();
        let execution = AssertUnwindSafe(agent.execute(task)).catch_unwind();

        match time::timeout(self.timeout, execution).await {
            Err(_) => {
                let after_ms = duration_ms(self.timeout);
                error!(agent = %name, after_ms, "Agent execution timed out");
                AgentResult::failure(
                    name,
                    ErrorKind::Timeout,
                    format!("Agent execution timed out after {after_ms} ms"),
                )
            }
            Ok(Err(panic)) => {
                let message = panic_message(panic.as_ref());
                error!(agent = %name, panic = %message, "Agent panicked during execution");
                AgentResult::failure(name, ErrorKind::Execution, format!("Agent panicked: {message}"))
            }
            Ok(Ok(Err(e))) => {
                error!(agent = %name, error = %e, "Agent execution failed");
                AgentResult::failure(name, e.kind(), e.to_string())
            }
            Ok(Ok(Ok(payload))) => {
                let result = AgentResult::success(name, execution_id(name, count), payload);
                registered.record_tokens(result.tokens_used());
                info!(
                    agent = %name,
                    execution_id = result.execution_id.as_deref().unwrap_or_default(),
                    elapsed_ms = duration_ms(started.elapsed()),
                    "Agent execution completed"
                );
                result
            }
        }
    }
}

impl Default for AgentExecutor {
    fn default() -> Self {
        Self::new(Duration::from_secs(120))
    }
}

/// `{name}_{count}_{timestamp}`; unique per agent because `count` is.
fn execution_id(name: &str, count: u64) -> String {
    format!("{name}_{count}_{}", Utc::now().format("%Y%m%dT%H%M%S%.6f"))
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AgentRegistry;
    use crate::testing::{Behaviour, StaticAgent};
    use serde_json::json;
    use std::sync::Arc;

    async fn registered(agent: StaticAgent) -> Arc<RegisteredAgent> {
        let registry = AgentRegistry::new();
        let name = agent.name_owned();
        registry.register(Arc::new(agent)).await;
        registry.get(&name).await.unwrap()
    }

    #[tokio::test]
    async fn test_success_is_stamped() {
        let entry = registered(StaticAgent::new("Alpha")).await;
        let result = AgentExecutor::default().run(&entry, &Task::new()).await;

        assert!(result.is_success());
        assert!(result.error.is_none());
        let id = result.execution_id.unwrap();
        assert!(id.starts_with("Alpha_1_"), "{id}");
        assert_eq!(result.payload.get("echo"), Some(&json!("Alpha")));
    }

    #[tokio::test]
    async fn test_execution_ids_are_unique() {
        let entry = registered(StaticAgent::new("Alpha")).await;
        let executor = AgentExecutor::default();

        let first = executor.run(&entry, &Task::new()).await.execution_id;
        let second = executor.run(&entry, &Task::new()).await.execution_id;
        assert_ne!(first, second);
        assert_eq!(entry.stats().execution_count, 2);
    }

    #[tokio::test]
    async fn test_validation_failure_skips_execute() {
        let agent = StaticAgent::new("Alpha").requiring(&["location"]);
        let calls = agent.calls();
        let entry = registered(agent).await;

        let result = AgentExecutor::default().run(&entry, &Task::new()).await;

        assert_eq!(result.error.as_deref(), Some(VALIDATION_FAILED));
        assert_eq!(result.error_kind, Some(ErrorKind::Validation));
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(entry.stats().execution_count, 0);
    }

    #[tokio::test]
    async fn test_error_is_converted() {
        let entry = registered(StaticAgent::new("Alpha").behaving(Behaviour::Fail)).await;
        let result = AgentExecutor::default().run(&entry, &Task::new()).await;

        assert!(!result.is_success());
        assert_eq!(result.error_kind, Some(ErrorKind::Execution));
        assert!(result.execution_id.is_none());
        assert_eq!(entry.stats().execution_count, 1);
    }

    #[tokio::test]
    async fn test_panic_is_caught() {
        let entry = registered(StaticAgent::new("Alpha").behaving(Behaviour::Panic)).await;
        let result = AgentExecutor::default().run(&entry, &Task::new()).await;

        assert_eq!(result.error_kind, Some(ErrorKind::Execution));
        assert!(result.error.unwrap().contains("boom"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_converted() {
        let entry = registered(
            StaticAgent::new("Alpha").behaving(Behaviour::Sleep(Duration::from_secs(60))),
        )
        .await;
        let executor = AgentExecutor::new(Duration::from_secs(1));

        let result = executor.run(&entry, &Task::new()).await;

        assert_eq!(result.error_kind, Some(ErrorKind::Timeout));
        assert_eq!(result.error.as_deref(), Some("Agent execution timed out after 1000 ms"));
    }

    #[tokio::test]
    async fn test_tokens_are_accumulated() {
        let entry = registered(StaticAgent::new("Alpha").with_tokens(1500)).await;
        let executor = AgentExecutor::default();
        executor.run(&entry, &Task::new()).await;
        executor.run(&entry, &Task::new()).await;

        assert_eq!(entry.stats().total_tokens_used, 3000);
    }
}

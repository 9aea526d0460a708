//! Agent orchestrator for Dealflow.
//!
//! This crate defines the agent contract, the execution wrapper, the agent
//! registry, the generic workflow executor and the lead-to-contract pipeline,
//! plus the concrete agents registered by default.

pub mod agents;
pub mod error;
pub mod executor;
pub mod history;
pub mod pipeline;
pub mod registry;
pub mod result;
pub mod task;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use dealflow_abstraction::TextGenerator;
use dealflow_core::{Providers, Settings};
use std::sync::Arc;
use tracing::{debug, info};

pub use error::{AgentError, OrchestrationError};
pub use executor::AgentExecutor;
pub use history::ExecutionHistory;
pub use pipeline::{LeadToContractPipeline, PipelineReport, PipelineStatus};
pub use registry::{AgentRegistry, AgentStats, RegisteredAgent};
pub use result::{AgentResult, ErrorKind, Payload, ResultStatus};
pub use task::{CONTEXT_KEY, Task};
pub use workflow::{Workflow, WorkflowResult, WorkflowStatus, WorkflowStep};

/// A unit of business logic that turns a task into a structured payload.
///
/// Expected business outcomes ("lead not qualified") are payload values, not
/// errors. Errors are reserved for faults and are converted into error
/// results by [`AgentExecutor`].
#[async_trait]
pub trait Agent: Send + Sync {
    /// Registry key.
    fn name(&self) -> &str;

    /// Returns a description of the agent's purpose.
    fn description(&self) -> &str;

    /// What drives the agent: a generator model id, or `"rules"`.
    fn model(&self) -> &str {
        "rules"
    }

    /// Structural check that required keys are present. No business rules.
    fn validate(&self, task: &Task) -> bool;

    /// Performs the agent's function.
    ///
    /// # Errors
    /// Returns an `AgentError` for faults (provider or generator failures,
    /// timeouts, unusable input values).
    async fn execute(&self, task: &Task) -> Result<Payload, AgentError>;
}

/// Owns the agent registry and execution history.
///
/// Construct one per process and share it by reference or `Arc`.
#[derive(Debug)]
pub struct Orchestrator {
    registry: AgentRegistry,
    history: ExecutionHistory,
    executor: AgentExecutor,
}

impl Orchestrator {
    /// Creates an orchestrator with no agents.
    #[must_use]
    pub fn new(executor: AgentExecutor) -> Self {
        Self { registry: AgentRegistry::new(), history: ExecutionHistory::new(), executor }
    }

    /// Creates an orchestrator with every built-in agent registered.
    pub async fn with_default_agents(
        settings: Arc<Settings>,
        generator: Arc<dyn TextGenerator>,
        providers: Providers,
    ) -> Self {
        let orchestrator = Self::new(AgentExecutor::new(settings.runtime.agent_timeout()));
        for agent in agents::default_agents(&settings, &generator, &providers) {
            orchestrator.register(agent).await;
        }
        info!(agents = orchestrator.registry.count().await, "Orchestrator ready");
        orchestrator
    }

    /// Registers an agent. A duplicate name replaces the earlier agent.
    ///
    /// # Returns
    /// Returns `true` if the name was new.
    pub async fn register(&self, agent: Arc<dyn Agent>) -> bool {
        self.registry.register(agent).await
    }

    /// Runs one agent through the execution wrapper.
    ///
    /// An unknown name yields a `not_found` error result.
    pub async fn run_agent(&self, name: &str, task: &Task) -> AgentResult {
        match self.registry.get(name).await {
            Some(registered) => self.executor.run(&registered, task).await,
            None => {
                debug!(agent = %name, "Agent not registered");
                AgentResult::failure(
                    name,
                    ErrorKind::NotFound,
                    OrchestrationError::AgentNotFound(name.to_string()).to_string(),
                )
            }
        }
    }

    /// Statistics for one agent.
    ///
    /// # Errors
    /// Returns `OrchestrationError::AgentNotFound` for an unknown name.
    pub async fn agent_stats(&self, name: &str) -> error::Result<AgentStats> {
        self.registry
            .stats(name)
            .await
            .ok_or_else(|| OrchestrationError::AgentNotFound(name.to_string()))
    }

    /// Statistics for every agent, sorted by name.
    pub async fn list_agents(&self) -> Vec<AgentStats> {
        self.registry.list().await
    }

    /// All recorded workflow results, oldest first.
    pub async fn history(&self) -> Vec<Arc<WorkflowResult>> {
        self.history.snapshot().await
    }

    #[must_use]
    pub const fn executor(&self) -> &AgentExecutor {
        &self.executor
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(AgentExecutor::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Behaviour, StaticAgent};
    use dealflow_models::MockGenerator;

    #[tokio::test]
    async fn test_run_unknown_agent() {
        let orchestrator = Orchestrator::default();
        let result = orchestrator.run_agent("Ghost", &Task::new()).await;

        assert_eq!(result.error.as_deref(), Some("Agent 'Ghost' not found"));
        assert_eq!(result.error_kind, Some(ErrorKind::NotFound));
        assert_eq!(result.agent, "Ghost");
    }

    #[tokio::test]
    async fn test_run_registered_agent() {
        let orchestrator = Orchestrator::default();
        assert!(orchestrator.register(Arc::new(StaticAgent::new("Alpha"))).await);

        let result = orchestrator.run_agent("Alpha", &Task::new()).await;
        assert!(result.is_success());
        assert_eq!(orchestrator.agent_stats("Alpha").await.unwrap().execution_count, 1);
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let orchestrator = Orchestrator::default();
        orchestrator.register(Arc::new(StaticAgent::new("Alpha"))).await;
        let replaced = orchestrator
            .register(Arc::new(StaticAgent::new("Alpha").behaving(Behaviour::Fail)))
            .await;

        assert!(!replaced);
        assert!(!orchestrator.run_agent("Alpha", &Task::new()).await.is_success());
    }

    #[tokio::test]
    async fn test_agent_stats_unknown() {
        let orchestrator = Orchestrator::default();
        assert!(matches!(
            orchestrator.agent_stats("Ghost").await,
            Err(OrchestrationError::AgentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_default_agents_registered() {
        let orchestrator = Orchestrator::with_default_agents(
            Arc::new(Settings::default()),
            Arc::new(MockGenerator::new("mock".to_string())),
            Providers::sample(),
        )
        .await;

        let names: Vec<String> =
            orchestrator.list_agents().await.into_iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "BuyerMatcher",
                "ContractAutomation",
                "DataAnalyst",
                "DealTracker",
                "FinancingAdvisor",
                "LeadQualifier",
                "LeadScout",
                "NegotiationAssistant",
                "OfferGenerator",
                "RehabEstimator",
                "SEOContent",
            ]
        );
    }
}

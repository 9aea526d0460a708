//! Agent registry for managing registered agents.
//!
//! Registration takes the write lock; lookups during workflow execution take
//! the read lock, so a registration never interleaves with a lookup.

use crate::Agent;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// A registered agent plus its execution bookkeeping.
pub struct RegisteredAgent {
    agent: Arc<dyn Agent>,
    executions: AtomicU64,
    tokens_used: AtomicU64,
    registered_at: DateTime<Utc>,
}

impl RegisteredAgent {
    fn new(agent: Arc<dyn Agent>) -> Self {
        Self {
            agent,
            executions: AtomicU64::new(0),
            tokens_used: AtomicU64::new(0),
            registered_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn agent(&self) -> &Arc<dyn Agent> {
        &self.agent
    }

    /// Increments the execution counter and returns the new count.
    pub fn record_execution(&self) -> u64 {
        self.executions.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn record_tokens(&self, tokens: u64) {
        self.tokens_used.fetch_add(tokens, Ordering::Relaxed);
    }

    #[must_use]
    pub fn stats(&self) -> AgentStats {
        AgentStats {
            name: self.agent.name().to_string(),
            description: self.agent.description().to_string(),
            model: self.agent.model().to_string(),
            execution_count: self.executions.load(Ordering::SeqCst),
            total_tokens_used: self.tokens_used.load(Ordering::Relaxed),
            registered_at: self.registered_at,
        }
    }
}

impl fmt::Debug for RegisteredAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredAgent")
            .field("name", &self.agent.name())
            .field("executions", &self.executions.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Point-in-time statistics for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub name: String,
    pub description: String,
    pub model: String,
    pub execution_count: u64,
    pub total_tokens_used: u64,
    pub registered_at: DateTime<Utc>,
}

/// Registry for managing agents.
pub struct AgentRegistry {
    /// Map of agent name to registered agent.
    agents: RwLock<HashMap<String, Arc<RegisteredAgent>>>,
}

impl fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("agent_count", &self.agents.try_read().map(|a| a.len()).unwrap_or(0))
            .finish_non_exhaustive()
    }
}

impl AgentRegistry {
    /// Creates a new empty agent registry.
    #[must_use]
    pub fn new() -> Self {
        Self { agents: RwLock::new(HashMap::new()) }
    }

    /// Registers an agent under its name.
    ///
    /// Re-registering a name replaces the previous agent and resets its
    /// statistics.
    ///
    /// # Returns
    /// Returns `true` if the agent was newly registered, `false` if it replaced an existing agent.
    pub async fn register(&self, agent: Arc<dyn Agent>) -> bool {
        let name = agent.name().to_string();

        debug!(agent = %name, "Registering agent");

        let mut agents = self.agents.write().await;
        let replaced = agents.insert(name.clone(), Arc::new(RegisteredAgent::new(agent))).is_some();

        if replaced {
            warn!(agent = %name, "Agent replaced in registry; check for duplicate registration");
        }

        !replaced
    }

    /// Retrieves an agent by name.
    pub async fn get(&self, name: &str) -> Option<Arc<RegisteredAgent>> {
        let agents = self.agents.read().await;
        agents.get(name).cloned()
    }

    /// Statistics for one agent.
    pub async fn stats(&self, name: &str) -> Option<AgentStats> {
        self.get(name).await.map(|a| a.stats())
    }

    /// Statistics for every agent, sorted by name.
    pub async fn list(&self) -> Vec<AgentStats> {
        let agents = self.agents.read().await;
        let mut stats: Vec<AgentStats> = agents.values().map(|a| a.stats()).collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        stats
    }

    /// Checks if an agent is registered.
    pub async fn is_registered(&self, name: &str) -> bool {
        let agents = self.agents.read().await;
        agents.contains_key(name)
    }

    /// Returns the number of registered agents.
    pub async fn count(&self) -> usize {
        let agents = self.agents.read().await;
        agents.len()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

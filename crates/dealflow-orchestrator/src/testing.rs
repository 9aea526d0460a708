//! Configurable agent for unit tests.

use crate::{Agent, AgentError, Payload, Task};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    Succeed,
    Fail,
    Panic,
    Sleep(Duration),
}

#[derive(Debug)]
pub struct StaticAgent {
    name: String,
    description: String,
    required: Vec<&'static str>,
    behaviour: Behaviour,
    tokens: u64,
    calls: Arc<AtomicUsize>,
}

impl StaticAgent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("{name} test agent"),
            required: Vec::new(),
            behaviour: Behaviour::Succeed,
            tokens: 0,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn requiring(mut self, keys: &[&'static str]) -> Self {
        self.required = keys.to_vec();
        self
    }

    pub fn behaving(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    pub fn with_tokens(mut self, tokens: u64) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    pub fn name_owned(&self) -> String {
        self.name.clone()
    }
}

#[async_trait]
impl Agent for StaticAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&self.required)
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Succeed => {}
            Behaviour::Fail => return Err(AgentError::Other("scripted failure".to_string())),
            Behaviour::Panic => panic!("boom"),
            Behaviour::Sleep(duration) => tokio::time::sleep(duration).await,
        }

        let mut payload = Payload::new();
        payload.insert("echo".to_string(), json!(self.name));
        payload.insert("task".to_string(), task.clone().into_value());
        payload.insert("tokens_used".to_string(), json!(self.tokens));
        Ok(payload)
    }
}

use super::support::to_payload;
use crate::{Agent, AgentError, Payload, Task};
use async_trait::async_trait;
use dealflow_core::PropertyCondition;
use dealflow_core::scoring::{RehabEstimate, estimate_rehab};
use serde::Serialize;
use tracing::info;

/// Estimates repair budget and timeline from size and condition.
///
/// Missing square footage falls back to a typical single-family size and a
/// missing condition is treated as fair.
#[derive(Debug, Default)]
pub struct RehabEstimatorAgent;

#[derive(Debug, Serialize)]
struct RehabReport {
    address: String,
    #[serde(flatten)]
    estimate: RehabEstimate,
}

impl RehabEstimatorAgent {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Agent for RehabEstimatorAgent {
    fn name(&self) -> &str {
        "RehabEstimator"
    }

    fn description(&self) -> &str {
        "Estimates rehab costs and timelines"
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&["address"])
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        let condition = match task.string("condition") {
            Some(label) => PropertyCondition::parse(&label)
                .ok_or_else(|| AgentError::InvalidInput(format!("Unknown condition: {label}")))?,
            None => PropertyCondition::default(),
        };

        let estimate = estimate_rehab(task.number("square_feet"), condition);
        let address = task.string("address").unwrap_or_default();
        info!(address = %address, total_cost = estimate.total_cost, "Rehab estimated");

        to_payload(&RehabReport { address, estimate })
    }
}

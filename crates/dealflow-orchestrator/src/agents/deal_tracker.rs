use super::support::to_payload;
use crate::{Agent, AgentError, Payload, Task};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

const DEFAULT_NEXT_STEPS: [&str; 3] = ["Follow up", "Send documents", "Schedule closing"];

/// Records deal milestones and suggests what comes next.
#[derive(Debug, Default)]
pub struct DealTrackerAgent;

#[derive(Debug, Serialize)]
struct MilestoneRecord {
    deal_id: String,
    milestone: String,
    recorded_at: DateTime<Utc>,
    next_steps: Vec<&'static str>,
}

impl DealTrackerAgent {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn next_steps(milestone: &str) -> &'static [&'static str] {
    match milestone.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
        "offer_sent" => &["Follow up with seller", "Prepare counter offer range"],
        "offer_accepted" | "under_contract" => &[
            "Deposit earnest money",
            "Order title search",
            "Schedule inspection",
            "Send deal to matched buyers",
        ],
        "inspection" | "inspection_complete" => &[
            "Review inspection report",
            "Renegotiate repairs if needed",
            "Confirm buyer assignment",
        ],
        "assigned" | "buyer_assigned" => &[
            "Collect assignment fee deposit",
            "Send assignment to title company",
            "Schedule closing",
        ],
        "closing_scheduled" => &["Confirm funds with buyer", "Review settlement statement"],
        "closed" => &["Record wholesale fee", "Request seller testimonial", "Archive deal file"],
        _ => &DEFAULT_NEXT_STEPS,
    }
}

#[async_trait]
impl Agent for DealTrackerAgent {
    fn name(&self) -> &str {
        "DealTracker"
    }

    fn description(&self) -> &str {
        "Tracks deal milestones and next steps"
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&["deal_id", "milestone"])
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        let deal_id = task
            .string("deal_id")
            .ok_or_else(|| AgentError::InvalidInput("'deal_id' must be a string".to_string()))?;
        let milestone = task
            .string("milestone")
            .ok_or_else(|| AgentError::InvalidInput("'milestone' must be a string".to_string()))?;

        info!(deal_id = %deal_id, milestone = %milestone, "Milestone recorded");

        to_payload(&MilestoneRecord {
            next_steps: next_steps(&milestone).to_vec(),
            deal_id,
            milestone,
            recorded_at: Utc::now(),
        })
    }
}

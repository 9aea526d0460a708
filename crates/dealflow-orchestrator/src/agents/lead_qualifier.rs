use super::support::to_payload;
use crate::{Agent, AgentError, CONTEXT_KEY, Payload, Task};
use async_trait::async_trait;
use dealflow_core::Settings;
use dealflow_core::providers::standardize_record;
use dealflow_core::scoring::assess_lead;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Scores a single lead record and recommends the next action.
pub struct LeadQualifierAgent {
    settings: Arc<Settings>,
}

impl LeadQualifierAgent {
    #[must_use]
    pub const fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Agent for LeadQualifierAgent {
    fn name(&self) -> &str {
        "LeadQualifier"
    }

    fn description(&self) -> &str {
        "Scores a lead and recommends whether to pursue it"
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&["address", "data_source"])
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        let mut record = task.as_map().clone();
        record.remove(CONTEXT_KEY);
        let location = task.string("location");

        let lead = standardize_record(&Value::Object(record), None, location.as_deref())?;
        if lead.address.is_empty() {
            return Err(AgentError::InvalidInput("'address' must not be empty".to_string()));
        }

        let scored = assess_lead(lead, &self.settings.business);
        info!(
            address = %scored.lead.address,
            score = scored.lead_score,
            recommendation = %scored.recommendation,
            "Lead qualified"
        );

        to_payload(&scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn agent() -> LeadQualifierAgent {
        LeadQualifierAgent::new(Arc::new(Settings::default()))
    }

    #[tokio::test]
    async fn test_tax_delinquent_reengage() {
        let task = Task::new()
            .with("address", "789 Tax Delinquent Ln")
            .with("data_source", "Tax Delinquent")
            .with("listing_time_days", 90)
            .with("tax_assessed_value", 200_000)
            .with("estimated_value", 320_000);
        let payload = agent().execute(&task).await.unwrap();

        assert_eq!(payload["lead_score"], json!(55));
        assert_eq!(payload["recommendation"], json!("Re-engage"));
        assert_eq!(payload["score_factors"]["source"], json!(20));
        assert!(payload["next_action"].as_str().unwrap().contains("nurture"));
    }

    #[tokio::test]
    async fn test_context_is_not_treated_as_lead_data() {
        let task = Task::new()
            .with("address", "321 Ghost House Rd")
            .with("data_source", "vacant")
            .with("listing_time_days", 120)
            .with("vacancy_duration_months", 8)
            .with("estimated_value", 280_000)
            .with("tax_assessed_value", 210_000)
            .with_context(json!({"status": "success"}));
        let payload = agent().execute(&task).await.unwrap();

        assert_eq!(payload["lead_score"], json!(68));
        assert_eq!(payload["recommendation"], json!("Qualify"));
        assert!(!payload.contains_key(CONTEXT_KEY));
    }

    #[tokio::test]
    async fn test_blank_address() {
        let task = Task::new().with("address", "  ").with("data_source", "fsbo");
        let err = agent().execute(&task).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidInput(_)));
    }
}

use super::support::{bounded, to_payload};
use crate::{Agent, AgentError, Payload, Task};
use async_trait::async_trait;
use dealflow_core::scoring::{FinancingOption, financing_options};
use dealflow_core::{LenderDirectory, Settings};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Lists lenders able to fund a loan amount, cheapest rate first.
pub struct FinancingAdvisorAgent {
    settings: Arc<Settings>,
    lenders: Arc<dyn LenderDirectory>,
}

#[derive(Debug, Serialize)]
struct FinancingReport {
    loan_amount: f64,
    options_found: usize,
    recommended_lender: Option<String>,
    options: Vec<FinancingOption>,
}

impl FinancingAdvisorAgent {
    #[must_use]
    pub fn new(settings: Arc<Settings>, lenders: Arc<dyn LenderDirectory>) -> Self {
        Self { settings, lenders }
    }
}

#[async_trait]
impl Agent for FinancingAdvisorAgent {
    fn name(&self) -> &str {
        "FinancingAdvisor"
    }

    fn description(&self) -> &str {
        "Matches deals with lenders and compares financing options"
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&["loan_amount"])
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        let loan_amount = task
            .number("loan_amount")
            .filter(|amount| *amount > 0.0)
            .ok_or_else(|| AgentError::InvalidInput("'loan_amount' must be a positive number".to_string()))?;

        let lenders = bounded(
            "lender directory",
            self.settings.runtime.provider_timeout(),
            self.lenders.lenders(),
        )
        .await?;

        let options = financing_options(&lenders, loan_amount);
        info!(loan_amount, lenders = lenders.len(), options = options.len(), "Financing compared");

        to_payload(&FinancingReport {
            loan_amount,
            options_found: options.len(),
            recommended_lender: options.first().map(|o| o.lender.name.clone()),
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealflow_core::providers::sample::SampleLenderDirectory;
    use serde_json::{Value, json};

    fn agent() -> FinancingAdvisorAgent {
        FinancingAdvisorAgent::new(
            Arc::new(Settings::default()),
            Arc::new(SampleLenderDirectory::default()),
        )
    }

    #[tokio::test]
    async fn test_cheapest_first() {
        let payload = agent().execute(&Task::new().with("loan_amount", 200_000)).await.unwrap();

        assert_eq!(payload["options_found"], json!(3));
        assert_eq!(payload["recommended_lender"], json!("First Community Bank"));
        let rates: Vec<f64> = payload["options"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["rate_percent"].as_f64().unwrap())
            .collect();
        assert_eq!(rates, vec![7.25, 10.0, 11.5]);
    }

    #[tokio::test]
    async fn test_range_filter() {
        let payload = agent().execute(&Task::new().with("loan_amount", 60_000)).await.unwrap();
        assert_eq!(payload["options_found"], json!(1));
        assert_eq!(payload["recommended_lender"], json!("Summit Bridge Capital"));

        let none = agent().execute(&Task::new().with("loan_amount", 9_000_000)).await.unwrap();
        assert_eq!(none["options_found"], json!(0));
        assert_eq!(none["recommended_lender"], Value::Null);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amount() {
        let err = agent().execute(&Task::new().with("loan_amount", 0)).await.unwrap_err();
        assert!(matches!(err, AgentError::InvalidInput(_)));
    }
}

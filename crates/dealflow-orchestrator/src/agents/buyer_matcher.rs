//! Buyer matching.

use super::support::{bounded, to_payload};
use crate::{Agent, AgentError, Payload, Task};
use async_trait::async_trait;
use dealflow_core::scoring::rank_matches;
use dealflow_core::{BuyerDirectory, BuyerMatch, BuyerProfile, PropertySummary, Settings};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Scores cash buyers against a property.
///
/// Buyers come from `available_buyers` in the task when present, otherwise
/// from the configured directory.
pub struct BuyerMatcherAgent {
    settings: Arc<Settings>,
    directory: Arc<dyn BuyerDirectory>,
}

#[derive(Debug, Serialize)]
struct MatchReport {
    property_id: String,
    property_address: String,
    total_buyers_available: usize,
    qualified_matches: usize,
    top_matches: Vec<BuyerMatch>,
    all_matches: Vec<BuyerMatch>,
}

impl BuyerMatcherAgent {
    #[must_use]
    pub fn new(settings: Arc<Settings>, directory: Arc<dyn BuyerDirectory>) -> Self {
        Self { settings, directory }
    }

    async fn buyers(&self, task: &Task) -> Result<Vec<BuyerProfile>, AgentError> {
        if let Some(buyers) = task.parse_optional::<Vec<BuyerProfile>>("available_buyers")? {
            debug!(count = buyers.len(), "Using buyers supplied with the task");
            return Ok(buyers);
        }
        bounded(
            "buyer directory",
            self.settings.runtime.provider_timeout(),
            self.directory.buyers(),
        )
        .await
    }
}

#[async_trait]
impl Agent for BuyerMatcherAgent {
    fn name(&self) -> &str {
        "BuyerMatcher"
    }

    fn description(&self) -> &str {
        "Matches properties with qualified cash buyers"
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&["property"])
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        let property: PropertySummary = task.parse("property")?;
        let buyers = self.buyers(task).await?;

        let business = &self.settings.business;
        let all_matches = rank_matches(&property, &buyers, business.qualified_match_threshold);
        let top_matches = all_matches.iter().take(business.top_matches).cloned().collect();

        info!(
            property = %property.address,
            buyers = buyers.len(),
            matches = all_matches.len(),
            "Buyers matched"
        );

        to_payload(&MatchReport {
            property_id: property.id.clone().unwrap_or_else(|| "unknown".to_string()),
            property_address: property.address,
            total_buyers_available: buyers.len(),
            qualified_matches: all_matches.len(),
            top_matches,
            all_matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealflow_core::ProviderError;
    use dealflow_core::providers::sample::SampleBuyerDirectory;
    use serde_json::json;

    fn agent() -> BuyerMatcherAgent {
        BuyerMatcherAgent::new(
            Arc::new(Settings::default()),
            Arc::new(SampleBuyerDirectory::default()),
        )
    }

    fn property() -> serde_json::Value {
        json!({
            "id": "prop_1",
            "address": "12 Elm St",
            "state": "CA",
            "property_type": "single_family",
            "estimated_after_repair_value": 400_000,
            "roi_percent": 30
        })
    }

    #[tokio::test]
    async fn test_matches_directory_buyers() {
        let payload = agent().execute(&Task::new().with("property", property())).await.unwrap();

        assert_eq!(payload["property_id"], json!("prop_1"));
        assert_eq!(payload["total_buyers_available"], json!(3));
        let all = payload["all_matches"].as_array().unwrap();
        assert_eq!(payload["qualified_matches"], json!(all.len()));
        assert!(!all.is_empty());

        let scores: Vec<f64> = all.iter().map(|m| m["match_score"].as_f64().unwrap()).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(scores.iter().all(|s| *s > 50.0));
        assert!(payload["top_matches"].as_array().unwrap().len() <= 5);
    }

    #[tokio::test]
    async fn test_task_buyers_take_precedence() {
        let task = Task::new().with("property", property()).with(
            "available_buyers",
            json!([{
                "id": "b9",
                "name": "Solo Buyer",
                "target_states": ["CA"],
                "preferred_property_types": ["single_family"],
                "min_deal_size": 100_000,
                "max_deal_size": 1_000_000,
                "is_active": true
            }]),
        );
        let payload = agent().execute(&task).await.unwrap();

        assert_eq!(payload["total_buyers_available"], json!(1));
        assert_eq!(payload["all_matches"][0]["buyer_id"], json!("b9"));
        assert_eq!(payload["property_id"], json!("prop_1"));
    }

    #[tokio::test]
    async fn test_missing_id_reported_as_unknown() {
        let mut property = property();
        property.as_object_mut().unwrap().remove("id");
        let payload = agent().execute(&Task::new().with("property", property)).await.unwrap();
        assert_eq!(payload["property_id"], json!("unknown"));
    }

    struct OfflineDirectory;

    #[async_trait]
    impl BuyerDirectory for OfflineDirectory {
        async fn buyers(&self) -> Result<Vec<BuyerProfile>, ProviderError> {
            Err(ProviderError::Unavailable("crm offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_directory_failure() {
        let agent = BuyerMatcherAgent::new(Arc::new(Settings::default()), Arc::new(OfflineDirectory));
        let err = agent.execute(&Task::new().with("property", property())).await.unwrap_err();
        assert!(matches!(err, AgentError::Provider(_)));
    }
}

use super::support::to_payload;
use crate::{Agent, AgentError, Payload, Task};
use async_trait::async_trait;
use dealflow_core::scoring::build_offer;
use dealflow_core::{PropertyDetails, Settings};
use std::sync::Arc;
use tracing::info;

/// Prices a cash offer from after-repair value and attaches standard terms.
pub struct OfferGeneratorAgent {
    settings: Arc<Settings>,
}

impl OfferGeneratorAgent {
    #[must_use]
    pub const fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Agent for OfferGeneratorAgent {
    fn name(&self) -> &str {
        "OfferGenerator"
    }

    fn description(&self) -> &str {
        "Calculates acquisition offers and standard contract terms"
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&["lead_id", "property_details"])
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        let lead_id = task
            .string("lead_id")
            .ok_or_else(|| AgentError::InvalidInput("'lead_id' must be a string".to_string()))?;
        let details: PropertyDetails = task.parse("property_details")?;

        let offer = build_offer(&lead_id, &details, &self.settings.pricing);
        info!(
            lead_id = %lead_id,
            offer_price = offer.quote.offer_price,
            roi_percent = offer.quote.roi_percent,
            "Offer priced"
        );

        to_payload(&offer)
    }
}

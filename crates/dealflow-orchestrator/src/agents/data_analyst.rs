use super::support::{bounded, to_payload};
use crate::{Agent, AgentError, Payload, Task};
use async_trait::async_trait;
use dealflow_core::scoring::{MarketAnalysis, analyze_market};
use dealflow_core::{MarketDataProvider, Settings};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Rates a property's market from provider data.
pub struct DataAnalystAgent {
    settings: Arc<Settings>,
    market: Arc<dyn MarketDataProvider>,
}

#[derive(Debug, Serialize)]
struct AnalysisReport {
    address: String,
    #[serde(flatten)]
    analysis: MarketAnalysis,
}

impl DataAnalystAgent {
    #[must_use]
    pub fn new(settings: Arc<Settings>, market: Arc<dyn MarketDataProvider>) -> Self {
        Self { settings, market }
    }
}

#[async_trait]
impl Agent for DataAnalystAgent {
    fn name(&self) -> &str {
        "DataAnalyst"
    }

    fn description(&self) -> &str {
        "Analyzes market data and rates investment potential"
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&["address"])
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        let address = task.string("address").unwrap_or_default();
        let snapshot = bounded(
            "market data",
            self.settings.runtime.provider_timeout(),
            self.market.snapshot(&address),
        )
        .await?;

        let analysis = analyze_market(&snapshot);
        info!(
            address = %address,
            score = analysis.property_score,
            rating = %analysis.investment_rating,
            "Market analyzed"
        );

        to_payload(&AnalysisReport { address, analysis })
    }
}

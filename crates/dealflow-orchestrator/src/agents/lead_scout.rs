//! Lead discovery and scoring.

use super::support::{bounded, to_payload};
use crate::{Agent, AgentError, Payload, Task};
use async_trait::async_trait;
use dealflow_core::providers::standardize_record;
use dealflow_core::scoring::assess_lead;
use dealflow_core::{LeadRecord, LeadSource, ProviderError, ScoredLead, Settings, SourceCategory};
use futures::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Search type that fans out to every configured source.
pub const SEARCH_ALL: &str = "all";

/// Scans lead sources for a location and keeps the leads worth pursuing.
pub struct LeadScoutAgent {
    settings: Arc<Settings>,
    sources: Vec<Arc<dyn LeadSource>>,
}

#[derive(Debug, Serialize)]
struct ScoutReport {
    search_type: String,
    location: String,
    sources_searched: Vec<String>,
    leads_found: usize,
    leads_qualified: usize,
    leads: Vec<ScoredLead>,
}

impl LeadScoutAgent {
    #[must_use]
    pub fn new(settings: Arc<Settings>, sources: Vec<Arc<dyn LeadSource>>) -> Self {
        Self { settings, sources }
    }

    fn select_sources(&self, search_type: &str) -> Result<Vec<Arc<dyn LeadSource>>, AgentError> {
        if search_type.eq_ignore_ascii_case(SEARCH_ALL) {
            return Ok(self.sources.clone());
        }

        let category = SourceCategory::from_search_type(search_type)
            .ok_or_else(|| AgentError::InvalidInput(format!("Unknown search type: {search_type}")))?;

        self.sources
            .iter()
            .find(|s| s.category() == category)
            .map(|s| vec![Arc::clone(s)])
            .ok_or_else(|| {
                AgentError::Provider(ProviderError::Unavailable(format!(
                    "no lead source configured for {category}"
                )))
            })
    }

    /// Fetches one source and standardizes its records. Unusable records are skipped.
    async fn scan(&self, source: &dyn LeadSource, location: &str) -> Result<Vec<LeadRecord>, AgentError> {
        let category = source.category();
        let operation = format!("lead source '{category}'");
        let raw = bounded(&operation, self.settings.runtime.provider_timeout(), source.fetch(location))
            .await?;

        Ok(raw
            .iter()
            .filter_map(|record| match standardize_record(record, Some(&category), Some(location)) {
                Ok(lead) => Some(lead),
                Err(e) => {
                    warn!(source = %category, error = %e, "Skipping unusable lead record");
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl Agent for LeadScoutAgent {
    fn name(&self) -> &str {
        "LeadScout"
    }

    fn description(&self) -> &str {
        "Finds motivated-seller leads across listing sources and scores them"
    }

    fn validate(&self, task: &Task) -> bool {
        task.has_keys(&["search_type", "location"])
    }

    async fn execute(&self, task: &Task) -> Result<Payload, AgentError> {
        let search_type = task
            .string("search_type")
            .ok_or_else(|| AgentError::InvalidInput("'search_type' must be a string".to_string()))?;
        let location = task
            .string("location")
            .ok_or_else(|| AgentError::InvalidInput("'location' must be a string".to_string()))?;

        let sources = self.select_sources(&search_type)?;
        info!(search_type = %search_type, location = %location, sources = sources.len(), "Scanning lead sources");

        let batches = try_join_all(sources.iter().map(|s| self.scan(s.as_ref(), &location))).await?;
        let found: Vec<LeadRecord> = batches.into_iter().flatten().collect();
        let leads_found = found.len();

        let business = &self.settings.business;
        let mut qualified: Vec<ScoredLead> = found
            .into_iter()
            .map(|lead| assess_lead(lead, business))
            .filter(|scored| scored.lead_score >= business.min_lead_score_threshold)
            .collect();
        qualified.sort_by(|a, b| b.lead_score.cmp(&a.lead_score));
        let leads_qualified = qualified.len();
        qualified.truncate(business.max_leads_returned);

        to_payload(&ScoutReport {
            search_type,
            location,
            sources_searched: sources.iter().map(|s| s.category().to_string()).collect(),
            leads_found,
            leads_qualified,
            leads: qualified,
        })
    }
}

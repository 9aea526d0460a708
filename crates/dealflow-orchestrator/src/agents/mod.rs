//! Built-in agents.

pub mod buyer_matcher;
pub mod contract_automation;
pub mod data_analyst;
pub mod deal_tracker;
pub mod financing_advisor;
pub mod lead_qualifier;
pub mod lead_scout;
pub mod negotiation;
pub mod offer_generator;
pub mod rehab_estimator;
pub mod seo_content;
pub(crate) mod support;

pub use buyer_matcher::BuyerMatcherAgent;
pub use contract_automation::ContractAutomationAgent;
pub use data_analyst::DataAnalystAgent;
pub use deal_tracker::DealTrackerAgent;
pub use financing_advisor::FinancingAdvisorAgent;
pub use lead_qualifier::LeadQualifierAgent;
pub use lead_scout::LeadScoutAgent;
pub use negotiation::NegotiationAssistantAgent;
pub use offer_generator::OfferGeneratorAgent;
pub use rehab_estimator::RehabEstimatorAgent;
pub use seo_content::SeoContentAgent;

use crate::Agent;
use dealflow_abstraction::TextGenerator;
use dealflow_core::{Providers, Settings};
use std::sync::Arc;

/// Every built-in agent, wired to the given settings, generator and providers.
#[must_use]
pub fn default_agents(
    settings: &Arc<Settings>,
    generator: &Arc<dyn TextGenerator>,
    providers: &Providers,
) -> Vec<Arc<dyn Agent>> {
    vec![
        Arc::new(LeadScoutAgent::new(Arc::clone(settings), providers.lead_sources.clone())),
        Arc::new(OfferGeneratorAgent::new(Arc::clone(settings))),
        Arc::new(BuyerMatcherAgent::new(Arc::clone(settings), Arc::clone(&providers.buyers))),
        Arc::new(NegotiationAssistantAgent::new()),
        Arc::new(SeoContentAgent::new(Arc::clone(settings), Arc::clone(generator))),
        Arc::new(LeadQualifierAgent::new(Arc::clone(settings))),
        Arc::new(DataAnalystAgent::new(Arc::clone(settings), Arc::clone(&providers.market))),
        Arc::new(RehabEstimatorAgent::new()),
        Arc::new(FinancingAdvisorAgent::new(Arc::clone(settings), Arc::clone(&providers.lenders))),
        Arc::new(ContractAutomationAgent::new(Arc::clone(settings), Arc::clone(generator))),
        Arc::new(DealTrackerAgent::new()),
    ]
}

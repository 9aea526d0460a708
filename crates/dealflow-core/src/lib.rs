//! Domain model, configuration and decision logic for Dealflow.
//!
//! Everything in this crate is independent of the agent runtime: the scoring
//! and pricing functions are pure, and the data providers are plain traits so
//! production integrations and test doubles share one contract.

pub mod config;
pub mod models;
pub mod providers;
pub mod record;
pub mod scoring;

pub use config::{
    BusinessConfig, ConfigError, ConfigResult, GeneratorSection, PricingConfig, RuntimeConfig,
    Settings,
};
pub use models::{
    BuyerMatch, BuyerProfile, ContractTerms, LeadRecord, LeadScoreFactors, LenderProfile,
    MarketSnapshot, MarketTrend, MatchFactors, Offer, OfferQuote, PropertyCondition,
    PropertyDetails, PropertySummary, Recommendation, ScoredLead, SourceCategory,
};
pub use providers::{
    BuyerDirectory, LeadSource, LenderDirectory, MarketDataProvider, ProviderError, Providers,
};

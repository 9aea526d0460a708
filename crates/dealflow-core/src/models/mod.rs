//! Domain types shared by scoring, providers and agents.

mod buyer;
mod lead;
mod market;
mod offer;

pub use buyer::{BuyerMatch, BuyerProfile, MatchFactors, PropertySummary};
pub use lead::{LeadRecord, LeadScoreFactors, Recommendation, ScoredLead, SourceCategory};
pub use market::{LenderProfile, MarketSnapshot, MarketTrend, PropertyCondition};
pub use offer::{ContractTerms, Offer, OfferQuote, PropertyDetails};

//! Deterministic scoring and pricing.
//!
//! Every function here is pure: identical inputs always produce identical
//! outputs, and none of them touch providers or the clock except where a
//! timestamp is part of the returned record.

pub mod buyer_match;
pub mod financing;
pub mod lead;
pub mod market;
pub mod offer;
pub mod rehab;

pub use buyer_match::{match_score, rank_matches};
pub use financing::{FinancingOption, financing_options};
pub use lead::{assess_lead, score_lead};
pub use market::{MarketAnalysis, analyze_market, investment_rating};
pub use offer::{build_offer, contract_terms, price_offer};
pub use rehab::{RehabEstimate, RehabLineItem, estimate_rehab};

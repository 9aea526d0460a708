//! Acquisition offers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Property inputs to offer pricing. Absent costs fall back to configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDetails {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub estimated_after_repair_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_repair_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_holding_cost: Option<f64>,
}

/// The numeric result of offer pricing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OfferQuote {
    pub offer_price: f64,
    pub arv: f64,
    pub repair_cost: f64,
    pub holding_cost: f64,
    pub wholesale_fee: f64,
    pub projected_profit: f64,
    pub roi_percent: f64,
}

/// Standard terms attached to every offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub offer_price: String,
    pub property_address: String,
    pub offer_valid_days: u32,
    pub inspection_period_days: u32,
    pub closing_timeline: String,
    pub contingencies: Vec<String>,
    pub special_terms: Vec<String>,
    pub earnest_money: String,
    pub closing_costs_paid_by: String,
}

/// An offer for one lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub lead_id: String,
    #[serde(flatten)]
    pub quote: OfferQuote,
    pub terms: ContractTerms,
    pub created_at: DateTime<Utc>,
}

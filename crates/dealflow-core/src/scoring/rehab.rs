//! Rehab cost estimation.

use crate::models::PropertyCondition;
use crate::record::round_to;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SQUARE_FEET: f64 = 1_500.0;
pub const CONTINGENCY_SHARE: f64 = 0.15;

/// Trade shares of the base budget. The last trade absorbs rounding.
const TRADE_SHARES: [(&str, f64); 5] = [
    ("Roof", 0.25),
    ("HVAC", 0.18),
    ("Electrical", 0.14),
    ("Plumbing", 0.14),
    ("Cosmetics", 0.29),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabLineItem {
    pub trade: String,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RehabEstimate {
    pub square_feet: f64,
    pub condition: PropertyCondition,
    pub cost_per_sqft: f64,
    pub base_cost: f64,
    pub breakdown: Vec<RehabLineItem>,
    pub contingency: f64,
    pub total_cost: f64,
    pub timeline_days: u32,
}

const fn cost_per_sqft(condition: PropertyCondition) -> f64 {
    match condition {
        PropertyCondition::Poor => 60.0,
        PropertyCondition::Fair => 35.0,
        PropertyCondition::Good => 15.0,
    }
}

const fn timeline_days(condition: PropertyCondition) -> u32 {
    match condition {
        PropertyCondition::Poor => 90,
        PropertyCondition::Fair => 60,
        PropertyCondition::Good => 30,
    }
}

/// Estimates rehab cost. Non-positive square footage falls back to the default.
#[must_use]
pub fn estimate_rehab(square_feet: Option<f64>, condition: PropertyCondition) -> RehabEstimate {
    let square_feet = square_feet.filter(|s| *s > 0.0).unwrap_or(DEFAULT_SQUARE_FEET);
    let per_sqft = cost_per_sqft(condition);
    let base_cost = round_to(square_feet * per_sqft, 2);

    let mut allocated = 0.0;
    let mut breakdown = Vec::with_capacity(TRADE_SHARES.len());
    for (i, (trade, share)) in TRADE_SHARES.iter().enumerate() {
        let cost = if i + 1 == TRADE_SHARES.len() {
            round_to(base_cost - allocated, 2)
        } else {
            round_to(base_cost * share, 2)
        };
        allocated += cost;
        breakdown.push(RehabLineItem { trade: (*trade).to_string(), cost });
    }

    let contingency = round_to(base_cost * CONTINGENCY_SHARE, 2);

    RehabEstimate {
        square_feet,
        condition,
        cost_per_sqft: per_sqft,
        base_cost,
        breakdown,
        contingency,
        total_cost: round_to(base_cost + contingency, 2),
        timeline_days: timeline_days(condition),
    }
}

//! Market, condition and lender data consumed by the analysis agents.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of local prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketTrend {
    Appreciating,
    Stable,
    Declining,
}

impl fmt::Display for MarketTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Appreciating => "Appreciating",
            Self::Stable => "Stable",
            Self::Declining => "Declining",
        };
        f.write_str(label)
    }
}

/// Raw market figures for one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub trend: MarketTrend,
    pub price_per_sqft: f64,
    pub days_on_market: f64,
    pub monthly_rent: f64,
    pub median_value: f64,
}

/// Physical condition, used for rehab estimates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyCondition {
    Poor,
    #[default]
    Fair,
    Good,
}

impl PropertyCondition {
    /// Parses a loose condition label; unknown labels yield `None`.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "poor" | "distressed" | "bad" => Some(Self::Poor),
            "fair" | "average" => Some(Self::Fair),
            "good" | "excellent" => Some(Self::Good),
            _ => None,
        }
    }
}

/// A lending product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderProfile {
    pub name: String,
    pub loan_type: String,
    pub rate_percent: f64,
    pub points: f64,
    pub term_months: u32,
    pub min_loan: f64,
    pub max_loan: f64,
}

impl LenderProfile {
    #[must_use]
    pub fn covers(&self, amount: f64) -> bool {
        amount >= self.min_loan && amount <= self.max_loan
    }
}

//! Cash buyers and the property summary they are matched against.

use serde::{Deserialize, Serialize};

fn default_max_deal_size() -> f64 {
    10_000_000.0
}

fn default_min_roi() -> f64 {
    20.0
}

fn default_roi_estimate() -> f64 {
    25.0
}

fn default_notification_method() -> String {
    "email".to_string()
}

/// Investment preferences of a buyer. Empty preference lists mean "any".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub target_states: Vec<String>,
    #[serde(default)]
    pub preferred_property_types: Vec<String>,
    #[serde(default)]
    pub min_deal_size: f64,
    #[serde(default = "default_max_deal_size")]
    pub max_deal_size: f64,
    #[serde(default = "default_min_roi")]
    pub min_roi_percent: f64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default = "default_notification_method")]
    pub notification_method: String,
}

impl BuyerProfile {
    /// Whether the buyer accepts a property in `state` (case-insensitive).
    #[must_use]
    pub fn targets_state(&self, state: &str) -> bool {
        self.target_states.is_empty()
            || self.target_states.iter().any(|s| s.eq_ignore_ascii_case(state.trim()))
    }

    /// Whether the buyer accepts `property_type`.
    #[must_use]
    pub fn prefers_type(&self, property_type: &str) -> bool {
        self.preferred_property_types.is_empty()
            || self.preferred_property_types.iter().any(|t| t == property_type)
    }
}

/// The slice of a property the buyer matcher looks at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub estimated_after_repair_value: f64,
    /// Estimated ROI; normally produced by offer pricing upstream.
    #[serde(default = "default_roi_estimate")]
    pub roi_percent: f64,
}

/// Human-readable explanation of a match score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFactors {
    pub geography: String,
    pub property_type: String,
    pub deal_size: String,
    pub roi: String,
    pub activity: String,
}

/// One buyer scored against one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyerMatch {
    pub buyer_id: String,
    pub buyer_name: String,
    pub match_score: f64,
    pub contact_method: String,
    pub match_factors: MatchFactors,
}

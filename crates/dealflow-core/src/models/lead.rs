//! Leads: standardized seller/property records and their scores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Where a lead was discovered.
///
/// Serialized as its display label ("Tax Delinquent", "FSBO", ...) so records
/// read the same whether they came from a provider or a caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceCategory {
    Fsbo,
    TaxDelinquent,
    ProbateEstate,
    VacantPropertyList,
    PreForeclosure,
    Other(String),
}

impl SourceCategory {
    /// Every concrete category, in the order an `all` search fans out.
    pub const SEARCHABLE: [Self; 4] =
        [Self::Fsbo, Self::TaxDelinquent, Self::VacantPropertyList, Self::ProbateEstate];

    /// Display label used on the wire.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Fsbo => "FSBO",
            Self::TaxDelinquent => "Tax Delinquent",
            Self::ProbateEstate => "Probate Estate",
            Self::VacantPropertyList => "Vacant Property List",
            Self::PreForeclosure => "Pre-Foreclosure",
            Self::Other(label) => label,
        }
    }

    /// Resolves a lead-scout `search_type` key. `all` is handled by the caller.
    #[must_use]
    pub fn from_search_type(search_type: &str) -> Option<Self> {
        match search_type.trim().to_lowercase().as_str() {
            "fsbo" => Some(Self::Fsbo),
            "tax_delinquent" => Some(Self::TaxDelinquent),
            "probate" | "probate_estate" => Some(Self::ProbateEstate),
            "vacant" | "vacant_property" => Some(Self::VacantPropertyList),
            "pre_foreclosure" | "preforeclosure" => Some(Self::PreForeclosure),
            _ => None,
        }
    }

    /// Source contribution to the lead score.
    #[must_use]
    pub const fn score_weight(&self) -> u32 {
        match self {
            Self::TaxDelinquent => 20,
            Self::ProbateEstate | Self::VacantPropertyList | Self::PreForeclosure => 18,
            Self::Fsbo => 15,
            Self::Other(_) => 10,
        }
    }
}

impl From<&str> for SourceCategory {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "fsbo" | "for sale by owner" => Self::Fsbo,
            "tax delinquent" => Self::TaxDelinquent,
            "probate estate" | "probate" => Self::ProbateEstate,
            "vacant property list" | "vacant" => Self::VacantPropertyList,
            "pre-foreclosure" | "pre foreclosure" => Self::PreForeclosure,
            _ => Self::from_search_type(trimmed).unwrap_or_else(|| Self::Other(trimmed.to_string())),
        }
    }
}

impl From<String> for SourceCategory {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<SourceCategory> for String {
    fn from(value: SourceCategory) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for SourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What to do with a scored lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Qualify,
    #[serde(rename = "Re-engage")]
    ReEngage,
    Reject,
}

impl Recommendation {
    /// Maps a score onto a recommendation using the configured thresholds.
    #[must_use]
    pub const fn from_score(score: u32, qualify_threshold: u32, reengage_threshold: u32) -> Self {
        if score >= qualify_threshold {
            Self::Qualify
        } else if score >= reengage_threshold {
            Self::ReEngage
        } else {
            Self::Reject
        }
    }

    #[must_use]
    pub const fn next_action(self) -> &'static str {
        match self {
            Self::Qualify => "Schedule property walkthrough and prepare an offer",
            Self::ReEngage => "Add to nurture sequence and follow up in 30 days",
            Self::Reject => "Archive lead; no further outreach",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qualify => "Qualify",
            Self::ReEngage => "Re-engage",
            Self::Reject => "Reject",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A standardized lead record.
///
/// Known scoring inputs are typed; anything else the provider returned is
/// kept in `extras` and written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<SourceCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_assessed_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_time_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_repair_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vacancy_duration_months: Option<u32>,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

/// Per-term breakdown of a lead score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadScoreFactors {
    pub source: u32,
    pub listing_age: u32,
    pub condition: u32,
    pub market: u32,
}

impl LeadScoreFactors {
    /// Sum of the four terms, capped at 100.
    #[must_use]
    pub fn total(&self) -> u32 {
        (self.source + self.listing_age + self.condition + self.market).min(100)
    }
}

/// A lead with its derived score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredLead {
    #[serde(flatten)]
    pub lead: LeadRecord,
    pub lead_score: u32,
    pub score_factors: LeadScoreFactors,
    pub recommendation: Recommendation,
    pub next_action: String,
    pub scoring_timestamp: DateTime<Utc>,
}

//! Raw provider records to [`LeadRecord`].

use super::ProviderError;
use crate::models::{LeadRecord, SourceCategory};
use crate::record::{get_f64, get_string, get_u32};
use serde_json::Value;

const CONSUMED_KEYS: [&str; 13] = [
    "address",
    "street",
    "city",
    "state",
    "zip_code",
    "zip",
    "property_type",
    "data_source",
    "estimated_value",
    "tax_assessed_value",
    "listing_time_days",
    "estimated_repair_cost",
    "vacancy_duration_months",
];

/// Fields produced by scoring. A re-scored record is recomputed from scratch.
const DERIVED_KEYS: [&str; 5] =
    ["lead_score", "score_factors", "recommendation", "next_action", "scoring_timestamp"];

/// Splits a `"City, ST"` query. A query without a comma is all city.
#[must_use]
pub fn split_location(location: &str) -> (Option<String>, Option<String>) {
    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    match location.split_once(',') {
        Some((city, state)) => (non_empty(city), non_empty(state).map(|s| s.to_uppercase())),
        None => (non_empty(location), None),
    }
}

/// Standardizes one raw record.
///
/// `category` fills `data_source` when the record has none; `location` fills
/// city and state likewise. Unrecognized keys are kept in `extras`; fields
/// from an earlier scoring pass are dropped.
///
/// # Errors
/// Returns `ProviderError::InvalidRecord` if `raw` is not a JSON object.
pub fn standardize_record(
    raw: &Value,
    category: Option<&SourceCategory>,
    location: Option<&str>,
) -> Result<LeadRecord, ProviderError> {
    let map = raw
        .as_object()
        .ok_or_else(|| ProviderError::InvalidRecord(format!("expected object, got {raw}")))?;

    let (query_city, query_state) = location.map(split_location).unwrap_or_default();

    let data_source = get_string(map, "data_source")
        .filter(|s| !s.trim().is_empty())
        .map(SourceCategory::from)
        .or_else(|| category.cloned());

    let extras = map
        .iter()
        .filter(|(k, _)| {
            !CONSUMED_KEYS.contains(&k.as_str()) && !DERIVED_KEYS.contains(&k.as_str())
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(LeadRecord {
        address: get_string(map, "address")
            .or_else(|| get_string(map, "street"))
            .map(|a| a.trim().to_string())
            .unwrap_or_default(),
        city: get_string(map, "city").or(query_city),
        state: get_string(map, "state").map(|s| s.trim().to_uppercase()).or(query_state),
        zip_code: get_string(map, "zip_code").or_else(|| get_string(map, "zip")),
        property_type: get_string(map, "property_type"),
        data_source,
        estimated_value: get_f64(map, "estimated_value"),
        tax_assessed_value: get_f64(map, "tax_assessed_value"),
        listing_time_days: get_u32(map, "listing_time_days"),
        estimated_repair_cost: get_f64(map, "estimated_repair_cost"),
        vacancy_duration_months: get_u32(map, "vacancy_duration_months"),
        extras,
    })
}

//! Lead qualification scoring.
//!
//! Four capped terms, summed and capped at 100:
//!
//! | Term | Points |
//! |---|---|
//! | source | 10-20 by [`SourceCategory::score_weight`] |
//! | listing age | >60 days 15, >30 days 10, else 5 |
//! | condition | vacant source 20, repairs >30k 18, vacant >6 months 15, else 0 |
//! | market | equity ratio >1.5 20, >1.2 15, else 10; 0 without a current value |

use crate::config::BusinessConfig;
use crate::models::{LeadRecord, LeadScoreFactors, Recommendation, ScoredLead, SourceCategory};
use chrono::Utc;

const HIGH_REPAIR_COST: f64 = 30_000.0;
const LONG_VACANCY_MONTHS: u32 = 6;

/// Computes the per-term breakdown for a lead.
#[must_use]
pub fn score_lead(lead: &LeadRecord) -> LeadScoreFactors {
    let source = lead.data_source.as_ref().map_or(10, SourceCategory::score_weight);

    let listing_age = match lead.listing_time_days.unwrap_or(0) {
        d if d > 60 => 15,
        d if d > 30 => 10,
        _ => 5,
    };

    let condition = if lead.data_source == Some(SourceCategory::VacantPropertyList) {
        20
    } else if lead.estimated_repair_cost.unwrap_or(0.0) > HIGH_REPAIR_COST {
        18
    } else if lead.vacancy_duration_months.unwrap_or(0) > LONG_VACANCY_MONTHS {
        15
    } else {
        0
    };

    LeadScoreFactors { source, listing_age, condition, market: market_term(lead) }
}

fn market_term(lead: &LeadRecord) -> u32 {
    let current = lead.estimated_value.unwrap_or(0.0);
    if current <= 0.0 {
        return 0;
    }
    match lead.tax_assessed_value {
        Some(assessed) if assessed > 0.0 && current > assessed => {
            let equity_ratio = current / assessed;
            if equity_ratio > 1.5 {
                20
            } else if equity_ratio > 1.2 {
                15
            } else {
                10
            }
        }
        _ => 10,
    }
}

/// Scores a lead and attaches the recommendation for the configured thresholds.
#[must_use]
pub fn assess_lead(lead: LeadRecord, business: &BusinessConfig) -> ScoredLead {
    let score_factors = score_lead(&lead);
    let lead_score = score_factors.total();
    let recommendation = Recommendation::from_score(
        lead_score,
        business.min_lead_score_threshold,
        business.reengage_score_threshold,
    );

    ScoredLead {
        lead,
        lead_score,
        score_factors,
        recommendation,
        next_action: recommendation.next_action().to_string(),
        scoring_timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tax_delinquent_lead() -> LeadRecord {
        LeadRecord {
            address: "789 Tax Delinquent Ln".to_string(),
            data_source: Some(SourceCategory::TaxDelinquent),
            listing_time_days: Some(90),
            tax_assessed_value: Some(200_000.0),
            estimated_value: Some(320_000.0),
            ..LeadRecord::default()
        }
    }

    #[test]
    fn test_tax_delinquent_scenario_scores_55() {
        let factors = score_lead(&tax_delinquent_lead());

        assert_eq!(factors.source, 20);
        assert_eq!(factors.listing_age, 15);
        assert_eq!(factors.condition, 0);
        assert_eq!(factors.market, 20);
        assert_eq!(factors.total(), 55);
    }

    #[test]
    fn test_scenario_recommendation_is_reengage() {
        let scored = assess_lead(tax_delinquent_lead(), &BusinessConfig::default());
        assert_eq!(scored.lead_score, 55);
        assert_eq!(scored.recommendation, Recommendation::ReEngage);
        assert_eq!(scored.next_action, Recommendation::ReEngage.next_action());
    }

    #[test]
    fn test_vacant_lead_qualifies() {
        let lead = LeadRecord {
            data_source: Some(SourceCategory::VacantPropertyList),
            listing_time_days: Some(90),
            estimated_value: Some(320_000.0),
            tax_assessed_value: Some(200_000.0),
            ..LeadRecord::default()
        };
        let scored = assess_lead(lead, &BusinessConfig::default());
        assert_eq!(scored.lead_score, 73);
        assert_eq!(scored.recommendation, Recommendation::Qualify);
    }

    #[test]
    fn test_condition_precedence() {
        let mut lead = LeadRecord {
            estimated_repair_cost: Some(45_000.0),
            vacancy_duration_months: Some(8),
            ..LeadRecord::default()
        };
        assert_eq!(score_lead(&lead).condition, 18);

        lead.estimated_repair_cost = Some(30_000.0);
        assert_eq!(score_lead(&lead).condition, 15);

        lead.vacancy_duration_months = Some(6);
        assert_eq!(score_lead(&lead).condition, 0);
    }

    #[test]
    fn test_listing_age_boundaries() {
        let mut lead = LeadRecord::default();
        for (days, expected) in [(0, 5), (30, 5), (31, 10), (60, 10), (61, 15)] {
            lead.listing_time_days = Some(days);
            assert_eq!(score_lead(&lead).listing_age, expected, "days = {days}");
        }
    }

    #[test]
    fn test_market_term_edges() {
        let mut lead = LeadRecord { estimated_value: Some(300_000.0), ..LeadRecord::default() };
        assert_eq!(score_lead(&lead).market, 10, "no assessed value");

        lead.tax_assessed_value = Some(300_000.0);
        assert_eq!(score_lead(&lead).market, 10, "no equity");

        lead.tax_assessed_value = Some(240_000.0);
        assert_eq!(score_lead(&lead).market, 15, "ratio 1.25");

        lead.estimated_value = None;
        assert_eq!(score_lead(&lead).market, 0, "no current value");
    }

    #[test]
    fn test_unknown_source_gets_default_weight() {
        let lead = LeadRecord {
            data_source: Some(SourceCategory::Other("Driving for Dollars".to_string())),
            ..LeadRecord::default()
        };
        assert_eq!(score_lead(&lead).source, 10);
        assert_eq!(score_lead(&LeadRecord::default()).source, 10);
    }

    #[test]
    fn test_score_bounded_for_all_combinations() {
        let sources = [
            None,
            Some(SourceCategory::Fsbo),
            Some(SourceCategory::TaxDelinquent),
            Some(SourceCategory::VacantPropertyList),
        ];
        for source in sources {
            for days in [None, Some(10), Some(45), Some(400)] {
                for repair in [None, Some(0.0), Some(80_000.0)] {
                    for (current, assessed) in
                        [(None, None), (Some(1.0), Some(1e9)), (Some(1e9), Some(1.0))]
                    {
                        let lead = LeadRecord {
                            data_source: source.clone(),
                            listing_time_days: days,
                            estimated_repair_cost: repair,
                            estimated_value: current,
                            tax_assessed_value: assessed,
                            vacancy_duration_months: Some(12),
                            ..LeadRecord::default()
                        };
                        assert!(score_lead(&lead).total() <= 100);
                    }
                }
            }
        }
    }

    #[test]
    fn test_rescoring_replaces_earlier_score() {
        let raw = serde_json::json!({
            "address": "1 Elm",
            "data_source": "FSBO",
            "lead_score": 99,
            "recommendation": "Qualify"
        });
        let lead = crate::providers::standardize_record(&raw, None, None).unwrap();
        let text = serde_json::to_string(&assess_lead(lead, &BusinessConfig::default())).unwrap();

        assert_eq!(text.matches("\"lead_score\"").count(), 1);
        assert_eq!(text.matches("\"recommendation\"").count(), 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["lead_score"], serde_json::json!(20));
        assert_eq!(value["recommendation"], serde_json::json!("Reject"));
    }
}

//! Buyer-to-property match scoring.

use crate::models::{BuyerMatch, BuyerProfile, MatchFactors, PropertySummary};
use crate::record::{format_usd, round_to};

/// Scores one buyer against one property.
///
/// The score is clamped at 100 but not at 0; geography can pull a poor
/// match negative.
#[must_use]
pub fn match_score(property: &PropertySummary, buyer: &BuyerProfile) -> (f64, MatchFactors) {
    let (geography, geography_note) = if buyer.target_states.is_empty() {
        (25.0, "OPEN - No state preference".to_string())
    } else if buyer.targets_state(&property.state) {
        (25.0, "MATCH - State in target list".to_string())
    } else {
        (-10.0, "DIFFERENT - Outside target states".to_string())
    };

    let (property_type, type_note) = if buyer.prefers_type(&property.property_type) {
        (20.0, "MATCH".to_string())
    } else {
        (10.0, "ACCEPTABLE - Will consider".to_string())
    };

    let (deal_size, size_note) = deal_size_term(property.estimated_after_repair_value, buyer);

    let (roi, roi_note) = if property.roi_percent >= buyer.min_roi_percent {
        (20.0, format!("MATCH - {:.1}% meets {:.1}% minimum", property.roi_percent, buyer.min_roi_percent))
    } else if property.roi_percent >= buyer.min_roi_percent * 0.8 {
        (12.0, format!("CLOSE - {:.1}% within 80% of {:.1}% minimum", property.roi_percent, buyer.min_roi_percent))
    } else {
        (5.0, format!("BELOW - {:.1}% under {:.1}% minimum", property.roi_percent, buyer.min_roi_percent))
    };

    let (activity, activity_note) =
        if buyer.is_active { (15.0, "ACTIVE") } else { (0.0, "INACTIVE") };

    let score = (geography + property_type + deal_size + roi + activity).min(100.0);
    let factors = MatchFactors {
        geography: geography_note,
        property_type: type_note,
        deal_size: size_note,
        roi: roi_note,
        activity: activity_note.to_string(),
    };
    (score, factors)
}

fn deal_size_term(value: f64, buyer: &BuyerProfile) -> (f64, String) {
    let (min, max) = (buyer.min_deal_size, buyer.max_deal_size);
    let range = format!("{} - {}", format_usd(min), format_usd(max));

    if value < min || value > max {
        return (0.0, format!("OUTSIDE - Buyer range {range}"));
    }

    let half_width = (max - min) / 2.0;
    if half_width <= 0.0 {
        return (5.0, format!("MATCH - Exactly {}", format_usd(min)));
    }

    let midpoint = (min + max) / 2.0;
    let alignment = 1.0 - (value - midpoint).abs() / half_width;
    (alignment * 20.0, format!("MATCH - Within {range} range"))
}

/// Scores every buyer, keeps those strictly above `threshold`, and sorts by
/// score descending. Equal scores keep their input order.
#[must_use]
pub fn rank_matches(
    property: &PropertySummary,
    buyers: &[BuyerProfile],
    threshold: f64,
) -> Vec<BuyerMatch> {
    let mut matches: Vec<BuyerMatch> = buyers
        .iter()
        .filter_map(|buyer| {
            let (score, match_factors) = match_score(property, buyer);
            (score > threshold).then(|| BuyerMatch {
                buyer_id: buyer.id.clone(),
                buyer_name: buyer.name.clone(),
                match_score: round_to(score, 1),
                contact_method: buyer.notification_method.clone(),
                match_factors,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn property() -> PropertySummary {
        serde_json::from_value(json!({
            "state": "CA",
            "property_type": "single_family",
            "estimated_after_repair_value": 500000,
            "roi_percent": 25
        }))
        .unwrap()
    }

    fn buyer(id: &str) -> BuyerProfile {
        serde_json::from_value(json!({
            "id": id,
            "name": format!("Buyer {id}"),
            "target_states": ["CA", "TX"],
            "preferred_property_types": ["single_family"],
            "min_deal_size": 100000,
            "max_deal_size": 900000,
            "min_roi_percent": 20,
            "is_active": true
        }))
        .unwrap()
    }

    #[test]
    fn test_ideal_match_scores_full_marks() {
        let (score, factors) = match_score(&property(), &buyer("b1"));
        assert!((score - 100.0).abs() < 1e-9);
        assert!(factors.geography.starts_with("MATCH"));
        assert!(factors.deal_size.contains("$100,000.00 - $900,000.00"));
    }

    #[test]
    fn test_match_is_deterministic() {
        let first = match_score(&property(), &buyer("b1"));
        let second = match_score(&property(), &buyer("b1"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_outside_state_is_negative_term() {
        let mut b = buyer("b1");
        b.target_states = vec!["WA".to_string()];
        b.is_active = false;
        b.preferred_property_types = vec!["multi_family".to_string()];
        b.min_roi_percent = 100.0;
        b.min_deal_size = 600_000.0;
        // -10 geography + 10 type + 0 size + 5 roi + 0 activity
        let (score, factors) = match_score(&property(), &b);
        assert!((score - 5.0).abs() < 1e-9);
        assert!(factors.deal_size.starts_with("OUTSIDE"));
    }

    #[test]
    fn test_zero_width_range() {
        let mut b = buyer("b1");
        b.min_deal_size = 500_000.0;
        b.max_deal_size = 500_000.0;
        let (score, _) = match_score(&property(), &b);
        assert!((score - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_deal_size_at_bound_scores_zero_alignment() {
        let mut p = property();
        p.estimated_after_repair_value = 900_000.0;
        let (score, _) = match_score(&p, &buyer("b1"));
        assert!((score - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_roi_tiers() {
        let mut p = property();
        p.roi_percent = 16.0;
        let (close, f) = match_score(&p, &buyer("b1"));
        assert!((close - 92.0).abs() < 1e-9);
        assert!(f.roi.starts_with("CLOSE"));

        p.roi_percent = 10.0;
        let (below, _) = match_score(&p, &buyer("b1"));
        assert!((below - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_filters_and_sorts_stably() {
        let strong_a = buyer("a");
        let mut weak = buyer("weak");
        weak.target_states = vec!["NY".to_string()];
        weak.is_active = false;
        weak.preferred_property_types = vec!["land".to_string()];
        let mut middling = buyer("mid");
        middling.is_active = false;
        let strong_b = buyer("b");

        let ranked =
            rank_matches(&property(), &[middling, strong_a, weak, strong_b], 50.0);
        let ids: Vec<&str> = ranked.iter().map(|m| m.buyer_id.as_str()).collect();

        assert_eq!(ids, vec!["a", "b", "mid"]);
        assert!((ranked[0].match_score - 100.0).abs() < f64::EPSILON);
        assert!((ranked[2].match_score - 85.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut b = buyer("edge");
        b.is_active = false;
        b.min_roi_percent = 100.0;
        b.preferred_property_types = vec!["land".to_string()];
        b.min_deal_size = 600_000.0;
        // 25 + 10 + 0 + 5 + 0 = 40
        assert!(rank_matches(&property(), &[b.clone()], 40.0).is_empty());
        assert_eq!(rank_matches(&property(), &[b], 39.9).len(), 1);
    }
}

//! Investment scoring from market data.

use crate::models::{MarketSnapshot, MarketTrend};
use crate::record::round_to;
use serde::{Deserialize, Serialize};

/// Market analysis for one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub market_trend: MarketTrend,
    pub price_per_sqft: f64,
    pub days_on_market: f64,
    pub rental_income_potential: f64,
    pub gross_yield_percent: f64,
    pub property_score: f64,
    pub investment_rating: String,
}

/// Scores a market snapshot out of 100.
///
/// Starts at 50 and adds trend (up to 20), liquidity (up to 15) and gross
/// rental yield (up to 15).
#[must_use]
pub fn analyze_market(snapshot: &MarketSnapshot) -> MarketAnalysis {
    let gross_yield = if snapshot.median_value > 0.0 {
        snapshot.monthly_rent * 12.0 / snapshot.median_value * 100.0
    } else {
        0.0
    };

    let trend_points: f64 = match snapshot.trend {
        MarketTrend::Appreciating => 20.0,
        MarketTrend::Stable => 10.0,
        MarketTrend::Declining => 0.0,
    };
    let liquidity_points = match snapshot.days_on_market {
        d if d < 30.0 => 15.0,
        d if d < 60.0 => 10.0,
        d if d < 90.0 => 5.0,
        _ => 0.0,
    };
    let yield_points = match gross_yield {
        y if y >= 10.0 => 15.0,
        y if y >= 8.0 => 10.0,
        y if y >= 6.0 => 5.0,
        _ => 0.0,
    };

    let property_score = (50.0 + trend_points + liquidity_points + yield_points).min(100.0);

    MarketAnalysis {
        market_trend: snapshot.trend,
        price_per_sqft: round_to(snapshot.price_per_sqft, 2),
        days_on_market: snapshot.days_on_market,
        rental_income_potential: round_to(snapshot.monthly_rent, 2),
        gross_yield_percent: round_to(gross_yield, 2),
        property_score,
        investment_rating: investment_rating(property_score).to_string(),
    }
}

/// Rating band for a property score.
#[must_use]
pub fn investment_rating(score: f64) -> &'static str {
    if score >= 80.0 {
        "Excellent"
    } else if score >= 65.0 {
        "Good"
    } else if score >= 50.0 {
        "Fair"
    } else {
        "Poor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(trend: MarketTrend, dom: f64, rent: f64) -> MarketSnapshot {
        MarketSnapshot {
            trend,
            price_per_sqft: 150.0,
            days_on_market: dom,
            monthly_rent: rent,
            median_value: 180_000.0,
        }
    }

    #[test]
    fn test_strong_market() {
        // yield = 1500 * 12 / 180000 = 10%
        let analysis = analyze_market(&snapshot(MarketTrend::Appreciating, 45.0, 1500.0));
        assert!((analysis.gross_yield_percent - 10.0).abs() < f64::EPSILON);
        assert!((analysis.property_score - 95.0).abs() < f64::EPSILON);
        assert_eq!(analysis.investment_rating, "Excellent");
    }

    #[test]
    fn test_weak_market() {
        let analysis = analyze_market(&snapshot(MarketTrend::Declining, 120.0, 500.0));
        assert!((analysis.property_score - 50.0).abs() < f64::EPSILON);
        assert_eq!(analysis.investment_rating, "Fair");
    }

    #[test]
    fn test_zero_median_value() {
        let mut s = snapshot(MarketTrend::Stable, 10.0, 1000.0);
        s.median_value = 0.0;
        let analysis = analyze_market(&s);
        assert!(analysis.gross_yield_percent.abs() < f64::EPSILON);
        assert!((analysis.property_score - 75.0).abs() < f64::EPSILON);
        assert_eq!(analysis.investment_rating, "Good");
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(investment_rating(80.0), "Excellent");
        assert_eq!(investment_rating(79.9), "Good");
        assert_eq!(investment_rating(50.0), "Fair");
        assert_eq!(investment_rating(49.9), "Poor");
    }
}

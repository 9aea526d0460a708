//! Acquisition offer pricing.

use crate::config::PricingConfig;
use crate::models::{ContractTerms, Offer, OfferQuote, PropertyDetails};
use crate::record::{format_usd, round_to};
use chrono::Utc;

/// Offers never drop below this share of ARV.
pub const FLOOR_SHARE_OF_ARV: f64 = 0.50;
/// Share of repair cost subtracted from the discounted baseline.
pub const REPAIR_ADJUSTMENT: f64 = 0.10;
/// Minimum earnest money deposit.
pub const MIN_EARNEST_MONEY: f64 = 5_000.0;

/// Prices an offer.
///
/// ```text
/// baseline = ARV * (1 - discount / 100)
/// adjusted = baseline - 0.1 * repair
/// offer    = max(adjusted, 0.5 * ARV)
/// fee      = offer * fee_percent / 100
/// profit   = ARV - offer - repair - holding - fee
/// roi      = profit / offer * 100   (0 when offer is 0)
/// ```
///
/// Negative inputs are treated as zero. Money is rounded to cents and ROI to
/// one decimal place.
#[must_use]
pub fn price_offer(details: &PropertyDetails, pricing: &PricingConfig) -> OfferQuote {
    let arv = details.estimated_after_repair_value.max(0.0);
    let repair_cost = details.estimated_repair_cost.unwrap_or(pricing.default_repair_cost).max(0.0);
    let holding_cost =
        details.estimated_holding_cost.unwrap_or(pricing.default_holding_cost).max(0.0);

    let baseline = arv * (1.0 - pricing.default_offer_discount_percent / 100.0);
    let adjusted = baseline - REPAIR_ADJUSTMENT * repair_cost;
    let floor = FLOOR_SHARE_OF_ARV * arv;

    // Cent rounding must not push the price across either bound.
    let offer_price = round_to(adjusted.max(floor), 2).clamp(floor, baseline.max(floor));

    let wholesale_fee = round_to(offer_price * pricing.wholesale_fee_percent / 100.0, 2);
    let projected_profit =
        round_to(arv - offer_price - repair_cost - holding_cost - wholesale_fee, 2);
    let roi_percent =
        if offer_price > 0.0 { round_to(projected_profit / offer_price * 100.0, 1) } else { 0.0 };

    OfferQuote {
        offer_price,
        arv,
        repair_cost,
        holding_cost,
        wholesale_fee,
        projected_profit,
        roi_percent,
    }
}

/// Standard terms for an offer at `offer_price`.
#[must_use]
pub fn contract_terms(offer_price: f64, property_address: &str) -> ContractTerms {
    let to_strings = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();

    ContractTerms {
        offer_price: format_usd(offer_price),
        property_address: property_address.to_string(),
        offer_valid_days: 7,
        inspection_period_days: 10,
        closing_timeline: "30 days".to_string(),
        contingencies: to_strings(&[
            "Property inspection",
            "Financing approval",
            "Title search",
            "Appraisal",
            "Survey (if required)",
        ]),
        special_terms: to_strings(&[
            "As-is condition",
            "Seller to provide all disclosures",
            "Cash offer",
            "Quick closing",
        ]),
        earnest_money: format_usd(MIN_EARNEST_MONEY.max(offer_price * 0.01)),
        closing_costs_paid_by: "Buyer".to_string(),
    }
}

/// Prices an offer for `lead_id` and attaches standard terms.
#[must_use]
pub fn build_offer(lead_id: &str, details: &PropertyDetails, pricing: &PricingConfig) -> Offer {
    let quote = price_offer(details, pricing);
    Offer {
        lead_id: lead_id.to_string(),
        terms: contract_terms(quote.offer_price, &details.address),
        quote,
        created_at: Utc::now(),
    }
}

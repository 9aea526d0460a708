//! In-memory providers with a small fixed data set.

use super::{BuyerDirectory, LeadSource, LenderDirectory, MarketDataProvider, ProviderError};
use crate::models::{BuyerProfile, LenderProfile, MarketSnapshot, MarketTrend, SourceCategory};
use async_trait::async_trait;
use serde_json::{Value, json};

/// Serves fixed records for one category. Addresses are the same for every
/// query; city and state come from standardization.
#[derive(Debug, Clone)]
pub struct SampleLeadSource {
    category: SourceCategory,
    records: Vec<Value>,
}

impl SampleLeadSource {
    #[must_use]
    pub fn new(category: SourceCategory) -> Self {
        let records = sample_records(&category);
        Self { category, records }
    }

    /// A source serving exactly `records`.
    #[must_use]
    pub const fn with_records(category: SourceCategory, records: Vec<Value>) -> Self {
        Self { category, records }
    }
}

fn sample_records(category: &SourceCategory) -> Vec<Value> {
    match category {
        SourceCategory::Fsbo => vec![
            json!({
                "address": "123 Main St",
                "zip_code": "90210",
                "source": "zillow_fsbo",
                "seller_phone": "555-0101",
                "property_type": "single_family",
                "estimated_value": 450_000,
                "listing_time_days": 45
            }),
            json!({
                "address": "456 Oak Ave",
                "zip_code": "90210",
                "source": "craigslist",
                "seller_email": "seller@example.com",
                "property_type": "single_family",
                "estimated_value": 350_000,
                "listing_time_days": 60
            }),
        ],
        SourceCategory::TaxDelinquent => vec![json!({
            "address": "789 Tax Delinquent Ln",
            "zip_code": "90210",
            "property_type": "single_family",
            "estimated_value": 320_000,
            "tax_assessed_value": 200_000,
            "listing_time_days": 90,
            "tax_lien_amount": 15_000,
            "years_delinquent": 2
        })],
        SourceCategory::VacantPropertyList => vec![json!({
            "address": "321 Ghost House Rd",
            "zip_code": "90210",
            "property_type": "vacant",
            "estimated_value": 280_000,
            "tax_assessed_value": 210_000,
            "listing_time_days": 120,
            "vacancy_duration_months": 8,
            "estimated_repair_cost": 45_000
        })],
        SourceCategory::ProbateEstate => vec![json!({
            "address": "654 Estate Ave",
            "zip_code": "90210",
            "property_type": "single_family",
            "estimated_value": 400_000,
            "listing_time_days": 75,
            "estimated_repair_cost": 35_000,
            "probate_case_number": "2024-123456"
        })],
        SourceCategory::PreForeclosure | SourceCategory::Other(_) => Vec::new(),
    }
}

#[async_trait]
impl LeadSource for SampleLeadSource {
    fn category(&self) -> SourceCategory {
        self.category.clone()
    }

    async fn fetch(&self, _location: &str) -> Result<Vec<Value>, ProviderError> {
        Ok(self.records.clone())
    }
}

/// Three buyers with distinct preferences.
#[derive(Debug, Clone)]
pub struct SampleBuyerDirectory {
    buyers: Vec<BuyerProfile>,
}

impl SampleBuyerDirectory {
    #[must_use]
    pub const fn new(buyers: Vec<BuyerProfile>) -> Self {
        Self { buyers }
    }
}

impl Default for SampleBuyerDirectory {
    fn default() -> Self {
        let buyer = |id: &str, name: &str, states: &[&str], min, max, types: &[&str], roi, via: &str| {
            BuyerProfile {
                id: id.to_string(),
                name: name.to_string(),
                target_states: states.iter().map(|s| (*s).to_string()).collect(),
                preferred_property_types: types.iter().map(|t| (*t).to_string()).collect(),
                min_deal_size: min,
                max_deal_size: max,
                min_roi_percent: roi,
                is_active: true,
                notification_method: via.to_string(),
            }
        };
        Self::new(vec![
            buyer(
                "buyer_001",
                "John Smith Investments",
                &["CA", "TX", "FL", "AZ"],
                100_000.0,
                2_000_000.0,
                &["single_family", "multi_family"],
                20.0,
                "email",
            ),
            buyer(
                "buyer_002",
                "Cash Flow Capital Partners",
                &["CA", "WA", "OR"],
                200_000.0,
                3_000_000.0,
                &["multi_family"],
                15.0,
                "sms",
            ),
            buyer(
                "buyer_003",
                "Quick Close Real Estate LLC",
                &[],
                50_000.0,
                5_000_000.0,
                &["single_family", "vacant"],
                25.0,
                "email",
            ),
        ])
    }
}

#[async_trait]
impl BuyerDirectory for SampleBuyerDirectory {
    async fn buyers(&self) -> Result<Vec<BuyerProfile>, ProviderError> {
        Ok(self.buyers.clone())
    }
}

/// A hard money, a private and a bank product.
#[derive(Debug, Clone)]
pub struct SampleLenderDirectory {
    lenders: Vec<LenderProfile>,
}

impl SampleLenderDirectory {
    #[must_use]
    pub const fn new(lenders: Vec<LenderProfile>) -> Self {
        Self { lenders }
    }
}

impl Default for SampleLenderDirectory {
    fn default() -> Self {
        let lender = |name: &str, loan_type: &str, rate, points, term_months, min_loan, max_loan| {
            LenderProfile {
                name: name.to_string(),
                loan_type: loan_type.to_string(),
                rate_percent: rate,
                points,
                term_months,
                min_loan,
                max_loan,
            }
        };
        Self::new(vec![
            lender("Summit Bridge Capital", "Hard Money", 11.5, 2.0, 12, 50_000.0, 2_000_000.0),
            lender("Keystone Private Lending", "Private", 10.0, 1.5, 18, 100_000.0, 750_000.0),
            lender("First Community Bank", "Portfolio", 7.25, 1.0, 360, 150_000.0, 1_500_000.0),
        ])
    }
}

#[async_trait]
impl LenderDirectory for SampleLenderDirectory {
    async fn lenders(&self) -> Result<Vec<LenderProfile>, ProviderError> {
        Ok(self.lenders.clone())
    }
}

/// Returns the same snapshot for every address.
#[derive(Debug, Clone)]
pub struct SampleMarketData {
    snapshot: MarketSnapshot,
}

impl SampleMarketData {
    #[must_use]
    pub const fn new(snapshot: MarketSnapshot) -> Self {
        Self { snapshot }
    }
}

impl Default for SampleMarketData {
    fn default() -> Self {
        Self::new(MarketSnapshot {
            trend: MarketTrend::Appreciating,
            price_per_sqft: 150.0,
            days_on_market: 45.0,
            monthly_rent: 1_500.0,
            median_value: 225_000.0,
        })
    }
}

#[async_trait]
impl MarketDataProvider for SampleMarketData {
    async fn snapshot(&self, address: &str) -> Result<MarketSnapshot, ProviderError> {
        if address.trim().is_empty() {
            return Err(ProviderError::NotFound("empty address".to_string()));
        }
        Ok(self.snapshot.clone())
    }
}

//! Pluggable data providers.
//!
//! Agents never embed listing, buyer, lender or market data. They read it
//! through these traits so a live integration and a test double are
//! interchangeable. The [`sample`] module holds in-memory implementations
//! used by default and in tests.

pub mod sample;
pub mod standardize;

use crate::models::{BuyerProfile, LenderProfile, MarketSnapshot, SourceCategory};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub use standardize::{split_location, standardize_record};

/// Errors raised by data providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider could not be reached or refused the request.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The provider has no data for the query.
    #[error("No data for {0}")]
    NotFound(String),

    /// The provider returned a record that cannot be used.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// A lead-discovery source for one category.
#[async_trait]
pub trait LeadSource: Send + Sync {
    fn category(&self) -> SourceCategory;

    /// Returns raw records for a `"City, ST"` query. Shapes vary by provider.
    async fn fetch(&self, location: &str) -> Result<Vec<Value>, ProviderError>;
}

/// Cash buyers available for matching.
#[async_trait]
pub trait BuyerDirectory: Send + Sync {
    async fn buyers(&self) -> Result<Vec<BuyerProfile>, ProviderError>;
}

/// Lending products available for financing.
#[async_trait]
pub trait LenderDirectory: Send + Sync {
    async fn lenders(&self) -> Result<Vec<LenderProfile>, ProviderError>;
}

/// Market figures by address.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn snapshot(&self, address: &str) -> Result<MarketSnapshot, ProviderError>;
}

/// The full set of providers the default agents are built from.
#[derive(Clone)]
pub struct Providers {
    pub lead_sources: Vec<Arc<dyn LeadSource>>,
    pub buyers: Arc<dyn BuyerDirectory>,
    pub lenders: Arc<dyn LenderDirectory>,
    pub market: Arc<dyn MarketDataProvider>,
}

impl Providers {
    /// In-memory sample data for every provider.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            lead_sources: SourceCategory::SEARCHABLE
                .into_iter()
                .map(|c| Arc::new(sample::SampleLeadSource::new(c)) as Arc<dyn LeadSource>)
                .collect(),
            buyers: Arc::new(sample::SampleBuyerDirectory::default()),
            lenders: Arc::new(sample::SampleLenderDirectory::default()),
            market: Arc::new(sample::SampleMarketData::default()),
        }
    }

    /// Finds the lead source for a category.
    #[must_use]
    pub fn lead_source(&self, category: &SourceCategory) -> Option<Arc<dyn LeadSource>> {
        self.lead_sources.iter().find(|s| &s.category() == category).cloned()
    }
}

impl fmt::Debug for Providers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let categories: Vec<SourceCategory> =
            self.lead_sources.iter().map(|s| s.category()).collect();
        f.debug_struct("Providers").field("lead_sources", &categories).finish_non_exhaustive()
    }
}

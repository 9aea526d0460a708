//! Lender selection.

use crate::models::LenderProfile;
use crate::record::round_to;
use serde::{Deserialize, Serialize};

/// A lender that can fund a given amount, with its carrying cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingOption {
    #[serde(flatten)]
    pub lender: LenderProfile,
    pub monthly_interest: f64,
    pub origination_fee: f64,
}

/// Lenders whose range contains `loan_amount`, cheapest rate first.
#[must_use]
pub fn financing_options(lenders: &[LenderProfile], loan_amount: f64) -> Vec<FinancingOption> {
    let mut options: Vec<FinancingOption> = lenders
        .iter()
        .filter(|l| l.covers(loan_amount))
        .map(|l| FinancingOption {
            monthly_interest: round_to(loan_amount * l.rate_percent / 100.0 / 12.0, 2),
            origination_fee: round_to(loan_amount * l.points / 100.0, 2),
            lender: l.clone(),
        })
        .collect();

    options.sort_by(|a, b| a.lender.rate_percent.total_cmp(&b.lender.rate_percent));
    options
}

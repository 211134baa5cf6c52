//! Output structures for cashflow projections

use crate::depreciation::DepreciationSchedule;
use serde::{Deserialize, Serialize};

/// One projection year. Loan figures reflect the balance at the start of the year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionYearRecord {
    /// 0 is the start snapshot, up to the horizon inclusive
    pub year: u32,

    // Loan
    pub remaining_principal: f64,
    pub equity_from_amortization: f64,
    pub total_equity: f64,
    pub annual_interest: f64,
    /// Contractual repayment, clamped to the balance
    pub regular_principal: f64,
    /// Voluntary repayment actually applied after clamping
    pub extra_principal: f64,
    pub total_principal_paid: f64,
    /// Interest plus contractual repayment, per month
    pub monthly_debt_service: f64,

    // Rent and costs (monthly, inflated)
    pub rent_monthly: f64,
    pub service_charges_monthly: f64,
    pub calculative_costs_monthly: f64,

    // Cashflow (monthly)
    pub monthly_cashflow_pre_tax: f64,
    pub monthly_cashflow_pre_tax_without_extra: f64,
    /// Rent less service charges, interest and depreciation
    pub taxable_cashflow_monthly: f64,
    /// Negative values are a tax benefit
    pub tax_monthly: f64,
    pub monthly_cashflow_after_tax: f64,
    pub monthly_cashflow_after_tax_without_extra: f64,

    // Running annual sums
    pub cumulative_cashflow_pre_tax: f64,
    pub cumulative_cashflow_pre_tax_without_extra: f64,
    pub cumulative_cashflow_after_tax: f64,
    pub cumulative_cashflow_after_tax_without_extra: f64,

    // Depreciation
    pub annual_depreciation: f64,
    pub special_depreciation: f64,
    pub monthly_depreciation: f64,
    /// Book value after this year; only known with a full schedule
    pub depreciation_book_value: Option<f64>,

    // Sale (only when sale modeling is enabled)
    pub property_value: Option<f64>,
    pub sale_costs: Option<f64>,
    /// Value less sale costs and the outstanding loan
    pub net_sale_proceeds: Option<f64>,
}

/// Result of a single projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    /// Exactly `horizon_years + 1` records
    pub years: Vec<ProjectionYearRecord>,
    /// Fixed payment for annuity loans
    pub fixed_monthly_payment: Option<f64>,
    /// Balance of the last record, at the end of the horizon
    pub final_remaining_principal: f64,
    /// Balance once the last record's own payments are applied
    pub balance_after_final_payment: f64,
    /// Schedule used when full depreciation parameters were supplied
    pub depreciation_schedule: Option<DepreciationSchedule>,
}

impl ProjectionResult {
    pub fn first_year(&self) -> Option<&ProjectionYearRecord> {
        self.years.first()
    }

    pub fn last_year(&self) -> Option<&ProjectionYearRecord> {
        self.years.last()
    }

    /// First year whose payments clear the loan
    pub fn payoff_year(&self) -> Option<u32> {
        self.years
            .iter()
            .find(|y| {
                y.remaining_principal > 0.0 && y.total_principal_paid >= y.remaining_principal
            })
            .map(|y| y.year)
    }
}

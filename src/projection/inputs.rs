//! Projection inputs: loan, rent and costs, tax, sale, depreciation source

use crate::depreciation::DepreciationParams;
use crate::error::{ensure_finite, ensure_horizon, ConfigError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Years the legacy constant depreciation amount applies
pub const DEFAULT_LEGACY_DEPRECIATION_YEARS: u32 = 50;

/// Default projection horizon
pub const DEFAULT_HORIZON_YEARS: u32 = 30;

/// Repayment scheme of the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum LoanType {
    /// Fixed monthly payment over the whole horizon
    Annuity,
    /// Interest plus a fixed repayment percentage of the current balance
    DecliningBalance,
}

impl FromStr for LoanType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "annuity" => Ok(LoanType::Annuity),
            "decliningBalance" | "declining_balance" => Ok(LoanType::DecliningBalance),
            other => Err(ConfigError::UnknownLoanType(other.to_string())),
        }
    }
}

impl TryFrom<String> for LoanType {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanProjectionInput {
    pub loan_principal: f64,

    /// Buyer's own capital put into the purchase
    #[serde(default)]
    pub equity: f64,

    /// Annual nominal interest rate (3.5 = 3.5%)
    pub interest_rate_percent: f64,

    /// Initial repayment rate for declining-balance loans (2.0 = 2%)
    #[serde(default)]
    pub amortization_rate_percent: f64,

    #[serde(default = "default_loan_type")]
    pub loan_type: LoanType,

    /// Voluntary repayment on top of the contractual schedule, per year
    #[serde(default)]
    pub extra_annual_principal: f64,

    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,
}

fn default_loan_type() -> LoanType { LoanType::DecliningBalance }
fn default_horizon_years() -> u32 { DEFAULT_HORIZON_YEARS }
fn default_legacy_years() -> u32 { DEFAULT_LEGACY_DEPRECIATION_YEARS }

/// Monthly rent and costs in first-year terms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentCostInput {
    /// Warm rent: cold rent plus recoverable service charge advances
    pub base_warm_rent: f64,
    #[serde(default)]
    pub service_charges: f64,
    /// Non-deductible reserves (maintenance, vacancy) used for cashflow only
    #[serde(default)]
    pub calculative_costs: f64,
    #[serde(default)]
    pub rent_inflation_percent: f64,
    #[serde(default)]
    pub cost_inflation_percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxInput {
    pub marginal_tax_rate_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleInput {
    pub initial_property_value: f64,
    #[serde(default)]
    pub annual_appreciation_percent: f64,
    /// Broker, notary and transfer costs on sale, as a share of the value
    #[serde(default)]
    pub sale_cost_percent: f64,
}

/// Complete input for one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionConfig {
    pub loan: LoanProjectionInput,
    pub rent: RentCostInput,
    #[serde(default)]
    pub tax: TaxInput,
    #[serde(default)]
    pub sale: Option<SaleInput>,

    /// Full schedule parameters; when absent the legacy constant is used
    #[serde(default)]
    pub depreciation: Option<DepreciationParams>,

    #[serde(default)]
    pub legacy_annual_depreciation: f64,

    #[serde(default = "default_legacy_years")]
    pub legacy_depreciation_years: u32,
}

impl ProjectionConfig {
    pub fn horizon_years(&self) -> u32 {
        self.loan.horizon_years
    }

    /// Purchase price for yield figures: from the depreciation inputs,
    /// otherwise the initial value of the sale model
    pub fn purchase_price(&self) -> Option<f64> {
        self.depreciation
            .as_ref()
            .map(|d| d.purchase_price)
            .or_else(|| self.sale.as_ref().map(|s| s.initial_property_value))
            .filter(|price| *price > 0.0)
    }

    /// Fail fast on input that cannot be projected
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_horizon(self.loan.horizon_years, 0)?;

        let loan = &self.loan;
        ensure_finite("loan_principal", loan.loan_principal)?;
        ensure_finite("equity", loan.equity)?;
        ensure_finite("interest_rate_percent", loan.interest_rate_percent)?;
        ensure_finite("amortization_rate_percent", loan.amortization_rate_percent)?;
        ensure_finite("extra_annual_principal", loan.extra_annual_principal)?;

        let rent = &self.rent;
        ensure_finite("base_warm_rent", rent.base_warm_rent)?;
        ensure_finite("service_charges", rent.service_charges)?;
        ensure_finite("calculative_costs", rent.calculative_costs)?;
        ensure_finite("rent_inflation_percent", rent.rent_inflation_percent)?;
        ensure_finite("cost_inflation_percent", rent.cost_inflation_percent)?;

        ensure_finite("marginal_tax_rate_percent", self.tax.marginal_tax_rate_percent)?;
        ensure_finite("legacy_annual_depreciation", self.legacy_annual_depreciation)?;

        if let Some(sale) = &self.sale {
            ensure_finite("initial_property_value", sale.initial_property_value)?;
            ensure_finite("annual_appreciation_percent", sale.annual_appreciation_percent)?;
            ensure_finite("sale_cost_percent", sale.sale_cost_percent)?;
        }

        if let Some(depreciation) = &self.depreciation {
            depreciation.validate()?;
        }

        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ProjectionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

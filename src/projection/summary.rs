//! Scalar KPIs over a projection result

use super::{ProjectionConfig, ProjectionResult};
use crate::depreciation::DepreciationSummary;
use serde::{Deserialize, Serialize};

/// Start-of-investment figures read by commentary and export consumers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyFigures {
    pub monthly_cashflow_pre_tax: f64,
    pub monthly_cashflow_after_tax: f64,
    /// Annual cold rent over purchase price
    pub gross_rental_yield_percent: Option<f64>,
    /// Annual cold rent less calculative costs over purchase price
    pub net_rental_yield_percent: Option<f64>,
    /// Net operating income over contractual debt service
    pub debt_service_coverage_ratio: Option<f64>,
}

/// Reduction of a projection over the whole horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub horizon_years: u32,
    pub total_interest: f64,
    pub total_principal_repaid: f64,
    pub final_remaining_principal: f64,
    pub final_total_equity: f64,
    pub payoff_year: Option<u32>,
    pub cumulative_cashflow_pre_tax: f64,
    pub cumulative_cashflow_after_tax: f64,
    pub cumulative_cashflow_after_tax_without_extra: f64,
    /// Sum of annual tax; negative when the property saves tax overall
    pub total_tax: f64,
    pub total_depreciation: f64,
    pub depreciation: Option<DepreciationSummary>,
    pub final_net_sale_proceeds: Option<f64>,
    pub key_figures: KeyFigures,
}

impl ProjectionSummary {
    pub fn from_result(result: &ProjectionResult, config: &ProjectionConfig) -> Self {
        let last = result.last_year();

        Self {
            horizon_years: config.horizon_years(),
            total_interest: result.years.iter().map(|y| y.annual_interest).sum(),
            total_principal_repaid: last.map(|y| y.equity_from_amortization).unwrap_or(0.0),
            final_remaining_principal: result.final_remaining_principal,
            final_total_equity: last.map(|y| y.total_equity).unwrap_or(config.loan.equity),
            payoff_year: result.payoff_year(),
            cumulative_cashflow_pre_tax: last.map(|y| y.cumulative_cashflow_pre_tax).unwrap_or(0.0),
            cumulative_cashflow_after_tax: last
                .map(|y| y.cumulative_cashflow_after_tax)
                .unwrap_or(0.0),
            cumulative_cashflow_after_tax_without_extra: last
                .map(|y| y.cumulative_cashflow_after_tax_without_extra)
                .unwrap_or(0.0),
            total_tax: result.years.iter().map(|y| y.tax_monthly * 12.0).sum(),
            total_depreciation: result.years.iter().map(|y| y.annual_depreciation).sum(),
            depreciation: result.depreciation_schedule.as_ref().map(|schedule| {
                DepreciationSummary::from_schedule(schedule, config.tax.marginal_tax_rate_percent)
            }),
            final_net_sale_proceeds: last.and_then(|y| y.net_sale_proceeds),
            key_figures: KeyFigures::from_result(result, config),
        }
    }
}

impl KeyFigures {
    pub fn from_result(result: &ProjectionResult, config: &ProjectionConfig) -> Self {
        let Some(first) = result.first_year() else {
            return Self::default();
        };

        let cold_rent_annual = (first.rent_monthly - first.service_charges_monthly) * 12.0;
        let net_operating_income = cold_rent_annual - first.calculative_costs_monthly * 12.0;
        let annual_debt_service = first.monthly_debt_service * 12.0;

        let price = config.purchase_price();
        Self {
            monthly_cashflow_pre_tax: first.monthly_cashflow_pre_tax,
            monthly_cashflow_after_tax: first.monthly_cashflow_after_tax,
            gross_rental_yield_percent: price.map(|p| cold_rent_annual / p * 100.0),
            net_rental_yield_percent: price.map(|p| net_operating_income / p * 100.0),
            debt_service_coverage_ratio: (annual_debt_service > 0.0)
                .then(|| net_operating_income / annual_debt_service),
        }
    }
}

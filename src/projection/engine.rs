//! Loan amortization and cashflow projection
//!
//! Year 0 is the purchase snapshot. Each year the record is emitted with the
//! balance carried into the year, then the year's repayment is applied.

use super::{LoanType, ProjectionConfig, ProjectionResult, ProjectionYearRecord};
use crate::depreciation::{generate, DepreciationSchedule};
use crate::error::ConfigError;
use log::debug;

/// Where a year's depreciation comes from
#[derive(Debug, Clone)]
enum DepreciationSource {
    Schedule(DepreciationSchedule),
    /// Constant amount for year indices below `years`
    Legacy { annual_amount: f64, years: u32 },
}

#[derive(Debug, Clone, Copy, Default)]
struct YearDepreciation {
    annual: f64,
    special: f64,
    book_value: Option<f64>,
}

impl DepreciationSource {
    fn resolve(config: &ProjectionConfig) -> Result<Self, ConfigError> {
        match &config.depreciation {
            // One extra record so the final horizon year has its own entry
            Some(params) => Ok(DepreciationSource::Schedule(generate(
                params,
                config.horizon_years() + 1,
            )?)),
            None => Ok(DepreciationSource::Legacy {
                annual_amount: config.legacy_annual_depreciation,
                years: config.legacy_depreciation_years,
            }),
        }
    }

    fn for_year(&self, index: u32) -> YearDepreciation {
        match self {
            DepreciationSource::Schedule(schedule) => schedule
                .year_at(index as usize)
                .map(|record| YearDepreciation {
                    annual: record.total_amount,
                    special: record.special_amount,
                    book_value: Some(record.remaining_book_value),
                })
                .unwrap_or_default(),
            DepreciationSource::Legacy { annual_amount, years } => {
                if index < *years {
                    YearDepreciation { annual: *annual_amount, ..Default::default() }
                } else {
                    YearDepreciation::default()
                }
            }
        }
    }

    fn into_schedule(self) -> Option<DepreciationSchedule> {
        match self {
            DepreciationSource::Schedule(schedule) => Some(schedule),
            DepreciationSource::Legacy { .. } => None,
        }
    }
}

/// Fixed monthly payment of an annuity loan repaid over `horizon_years`.
///
/// Returns 0 for a non-positive principal or a zero horizon.
pub fn annuity_monthly_payment(
    principal: f64,
    interest_rate_percent: f64,
    horizon_years: u32,
) -> f64 {
    if principal <= 0.0 || horizon_years == 0 {
        return 0.0;
    }
    let months = horizon_years as i32 * 12;
    let monthly_rate = interest_rate_percent / 100.0 / 12.0;
    if monthly_rate == 0.0 {
        return principal / months as f64;
    }
    let growth = (1.0 + monthly_rate).powi(months);
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Running cumulative cashflows (annualised)
#[derive(Debug, Clone, Copy, Default)]
struct CumulativeCashflow {
    pre_tax: f64,
    pre_tax_without_extra: f64,
    after_tax: f64,
    after_tax_without_extra: f64,
}

/// Project `config` over `horizon_years + 1` years
pub fn project(config: &ProjectionConfig) -> Result<ProjectionResult, ConfigError> {
    config.validate()?;

    let loan = &config.loan;
    let rent = &config.rent;
    let horizon = config.horizon_years();
    let tax_rate = config.tax.marginal_tax_rate_percent / 100.0;

    let depreciation = DepreciationSource::resolve(config)?;

    let original_principal = loan.loan_principal.max(0.0);
    let fixed_monthly_payment = match loan.loan_type {
        LoanType::Annuity => Some(annuity_monthly_payment(
            original_principal,
            loan.interest_rate_percent,
            horizon,
        )),
        LoanType::DecliningBalance => None,
    };

    debug!(
        "Projecting {} years: {:?} loan of {:.2} at {}%",
        horizon, loan.loan_type, original_principal, loan.interest_rate_percent
    );
    if let Some(payment) = fixed_monthly_payment {
        debug!("Fixed annuity payment {:.2} per month", payment);
    }

    let extra_principal = loan.extra_annual_principal.max(0.0);
    let mut remaining = original_principal;
    let mut cumulative = CumulativeCashflow::default();
    let mut years = Vec::with_capacity(horizon as usize + 1);

    for year in 0..=horizon {
        let rent_growth = (1.0 + rent.rent_inflation_percent / 100.0).powi(year as i32);
        let cost_growth = (1.0 + rent.cost_inflation_percent / 100.0).powi(year as i32);
        let rent_monthly = rent.base_warm_rent * rent_growth;
        let service_charges_monthly = rent.service_charges * cost_growth;
        let calculative_costs_monthly = rent.calculative_costs * cost_growth;

        // Simple interest on the balance carried into the year
        let annual_interest = remaining * loan.interest_rate_percent / 100.0;
        let monthly_interest = annual_interest / 12.0;

        let regular_principal = match fixed_monthly_payment {
            Some(payment) => ((payment - monthly_interest) * 12.0).max(0.0),
            None => {
                let annual_payment =
                    remaining * (loan.interest_rate_percent + loan.amortization_rate_percent)
                        / 100.0;
                (annual_payment - annual_interest).max(0.0)
            }
        };

        let regular_paid = regular_principal.min(remaining);
        let total_principal_paid = (regular_principal + extra_principal).min(remaining);

        let operating =
            rent_monthly - service_charges_monthly - calculative_costs_monthly - monthly_interest;
        let monthly_cashflow_pre_tax = operating - total_principal_paid / 12.0;
        let monthly_cashflow_pre_tax_without_extra = operating - regular_paid / 12.0;

        // Calculative costs are not deductible and stay out of the tax base
        let year_depreciation = depreciation.for_year(year);
        let monthly_depreciation = year_depreciation.annual / 12.0;
        let taxable_cashflow_monthly =
            rent_monthly - service_charges_monthly - monthly_interest - monthly_depreciation;
        let tax_monthly = taxable_cashflow_monthly * tax_rate;

        let monthly_cashflow_after_tax = monthly_cashflow_pre_tax - tax_monthly;
        let monthly_cashflow_after_tax_without_extra =
            monthly_cashflow_pre_tax_without_extra - tax_monthly;

        cumulative.pre_tax += monthly_cashflow_pre_tax * 12.0;
        cumulative.pre_tax_without_extra += monthly_cashflow_pre_tax_without_extra * 12.0;
        cumulative.after_tax += monthly_cashflow_after_tax * 12.0;
        cumulative.after_tax_without_extra += monthly_cashflow_after_tax_without_extra * 12.0;

        let equity_from_amortization = original_principal - remaining;

        let (property_value, sale_costs, net_sale_proceeds) = match &config.sale {
            Some(sale) => {
                let value = sale.initial_property_value
                    * (1.0 + sale.annual_appreciation_percent / 100.0).powi(year as i32);
                let costs = value * sale.sale_cost_percent / 100.0;
                (Some(value), Some(costs), Some(value - costs - remaining))
            }
            None => (None, None, None),
        };

        years.push(ProjectionYearRecord {
            year,
            remaining_principal: remaining,
            equity_from_amortization,
            total_equity: loan.equity + equity_from_amortization,
            annual_interest,
            regular_principal: regular_paid,
            extra_principal: total_principal_paid - regular_paid,
            total_principal_paid,
            monthly_debt_service: monthly_interest + regular_paid / 12.0,
            rent_monthly,
            service_charges_monthly,
            calculative_costs_monthly,
            monthly_cashflow_pre_tax,
            monthly_cashflow_pre_tax_without_extra,
            taxable_cashflow_monthly,
            tax_monthly,
            monthly_cashflow_after_tax,
            monthly_cashflow_after_tax_without_extra,
            cumulative_cashflow_pre_tax: cumulative.pre_tax,
            cumulative_cashflow_pre_tax_without_extra: cumulative.pre_tax_without_extra,
            cumulative_cashflow_after_tax: cumulative.after_tax,
            cumulative_cashflow_after_tax_without_extra: cumulative.after_tax_without_extra,
            annual_depreciation: year_depreciation.annual,
            special_depreciation: year_depreciation.special,
            monthly_depreciation,
            depreciation_book_value: year_depreciation.book_value,
            property_value,
            sale_costs,
            net_sale_proceeds,
        });

        let was_outstanding = remaining > 0.0;
        remaining = (remaining - total_principal_paid).max(0.0);
        if was_outstanding && remaining == 0.0 {
            debug!("Loan fully repaid in year {}", year);
        }
    }

    let final_remaining_principal =
        years.last().map_or(original_principal, |y| y.remaining_principal);

    Ok(ProjectionResult {
        years,
        fixed_monthly_payment,
        final_remaining_principal,
        balance_after_final_payment: remaining,
        depreciation_schedule: depreciation.into_schedule(),
    })
}

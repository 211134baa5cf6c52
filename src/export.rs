//! CSV export of projection and depreciation series
//!
//! Amounts are rounded to cents here and nowhere else.

use crate::depreciation::DepreciationSchedule;
use crate::error::ExportError;
use crate::projection::ProjectionYearRecord;
use serde::Serialize;
use std::io::Write;

fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectionRow {
    year: u32,
    remaining_principal: f64,
    annual_interest: f64,
    total_principal_paid: f64,
    equity_from_amortization: f64,
    total_equity: f64,
    rent_monthly: f64,
    monthly_cashflow_pre_tax: f64,
    monthly_cashflow_pre_tax_without_extra: f64,
    tax_monthly: f64,
    monthly_cashflow_after_tax: f64,
    monthly_cashflow_after_tax_without_extra: f64,
    cumulative_cashflow_after_tax: f64,
    cumulative_cashflow_after_tax_without_extra: f64,
    annual_depreciation: f64,
    depreciation_book_value: Option<f64>,
    property_value: Option<f64>,
    sale_costs: Option<f64>,
    net_sale_proceeds: Option<f64>,
}

impl From<&ProjectionYearRecord> for ProjectionRow {
    fn from(r: &ProjectionYearRecord) -> Self {
        Self {
            year: r.year,
            remaining_principal: cents(r.remaining_principal),
            annual_interest: cents(r.annual_interest),
            total_principal_paid: cents(r.total_principal_paid),
            equity_from_amortization: cents(r.equity_from_amortization),
            total_equity: cents(r.total_equity),
            rent_monthly: cents(r.rent_monthly),
            monthly_cashflow_pre_tax: cents(r.monthly_cashflow_pre_tax),
            monthly_cashflow_pre_tax_without_extra: cents(r.monthly_cashflow_pre_tax_without_extra),
            tax_monthly: cents(r.tax_monthly),
            monthly_cashflow_after_tax: cents(r.monthly_cashflow_after_tax),
            monthly_cashflow_after_tax_without_extra: cents(
                r.monthly_cashflow_after_tax_without_extra,
            ),
            cumulative_cashflow_after_tax: cents(r.cumulative_cashflow_after_tax),
            cumulative_cashflow_after_tax_without_extra: cents(
                r.cumulative_cashflow_after_tax_without_extra,
            ),
            annual_depreciation: cents(r.annual_depreciation),
            depreciation_book_value: r.depreciation_book_value.map(cents),
            property_value: r.property_value.map(cents),
            sale_costs: r.sale_costs.map(cents),
            net_sale_proceeds: r.net_sale_proceeds.map(cents),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRow {
    year: i32,
    linear_amount: f64,
    special_amount: f64,
    total_amount: f64,
    remaining_book_value: f64,
    effective_rate_percent: f64,
    cumulative_amount: f64,
}

/// Write one CSV row per projection year, with a header
pub fn write_projection_csv<W: Write>(
    records: &[ProjectionYearRecord],
    writer: W,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(ProjectionRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one CSV row per depreciation year, with a header
pub fn write_schedule_csv<W: Write>(
    schedule: &DepreciationSchedule,
    writer: W,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for y in &schedule.years {
        wtr.serialize(ScheduleRow {
            year: y.year,
            linear_amount: cents(y.linear_amount),
            special_amount: cents(y.special_amount),
            total_amount: cents(y.total_amount),
            remaining_book_value: cents(y.remaining_book_value),
            effective_rate_percent: (y.effective_rate_percent * 10_000.0).round() / 10_000.0,
            cumulative_amount: cents(y.cumulative_amount),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depreciation::{generate, DepreciationModel, DepreciationParams};
    use crate::projection::{
        project, LoanProjectionInput, LoanType, ProjectionConfig, RentCostInput, TaxInput,
    };

    #[test]
    fn test_cents() {
        assert_eq!(cents(1432.2458), 1432.25);
        assert_eq!(cents(-0.004), -0.0);
        assert_eq!(cents(4800.0), 4800.0);
    }

    #[test]
    fn test_schedule_csv() {
        let params = DepreciationParams {
            purchase_price: 300_000.0,
            land_value: 60_000.0,
            living_area: 80.0,
            model: DepreciationModel::Linear2,
            use_special_allowance: false,
            start_year: 2025,
        };
        let schedule = generate(&params, 3).unwrap();

        let mut buffer = Vec::new();
        write_schedule_csv(&schedule, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "year,linearAmount,specialAmount,totalAmount,remainingBookValue,effectiveRatePercent,cumulativeAmount"
        );
        assert_eq!(lines[1], "2025,4800.0,0.0,4800.0,235200.0,2.0,4800.0");
    }

    #[test]
    fn test_projection_csv_has_one_row_per_year() {
        let config = ProjectionConfig {
            loan: LoanProjectionInput {
                loan_principal: 250_000.0,
                equity: 50_000.0,
                interest_rate_percent: 3.9,
                amortization_rate_percent: 2.0,
                loan_type: LoanType::DecliningBalance,
                extra_annual_principal: 0.0,
                horizon_years: 5,
            },
            rent: RentCostInput { base_warm_rent: 1200.0, ..Default::default() },
            tax: TaxInput { marginal_tax_rate_percent: 35.0 },
            sale: None,
            depreciation: None,
            legacy_annual_depreciation: 4000.0,
            legacy_depreciation_years: 50,
        };
        let result = project(&config).unwrap();

        let mut buffer = Vec::new();
        write_projection_csv(&result.years, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("year,remainingPrincipal,annualInterest"));
        assert!(lines[1].starts_with("0,250000.0,9750.0,"));
        // Optional sale columns are left empty
        assert!(lines[1].ends_with(",,,,"));
    }
}

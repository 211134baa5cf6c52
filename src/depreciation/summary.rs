//! Scalar KPIs over a depreciation schedule

use super::{DepreciationModel, DepreciationSchedule};
use serde::{Deserialize, Serialize};

/// Reduction of a schedule for dashboards and exports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationSummary {
    pub model: DepreciationModel,
    pub building_value: f64,
    pub total_depreciation: f64,
    /// Total depreciation times the marginal tax rate
    pub tax_saving: f64,
    /// Mean of the yearly effective rates over the whole horizon
    pub average_effective_rate_percent: f64,
    pub special_allowance_years: usize,
    pub first_year_rate_percent: f64,
    /// Taken from the generator, not inferred from the amounts
    pub switch_year: Option<i32>,
    /// First calendar year that ends with a zero book value
    pub fully_depreciated_year: Option<i32>,
}

impl DepreciationSummary {
    pub fn from_schedule(schedule: &DepreciationSchedule, marginal_tax_rate_percent: f64) -> Self {
        let total_depreciation = schedule.total_depreciation();
        let years = schedule.years.len();

        let average_effective_rate_percent = if years > 0 {
            schedule.years.iter().map(|y| y.effective_rate_percent).sum::<f64>() / years as f64
        } else {
            0.0
        };

        let fully_depreciated_year = if schedule.building_value > 0.0 {
            schedule
                .years
                .iter()
                .find(|y| y.remaining_book_value <= 0.0)
                .map(|y| y.year)
        } else {
            None
        };

        Self {
            model: schedule.model,
            building_value: schedule.building_value,
            total_depreciation,
            tax_saving: total_depreciation * marginal_tax_rate_percent / 100.0,
            average_effective_rate_percent,
            special_allowance_years: schedule
                .years
                .iter()
                .filter(|y| y.special_amount > 0.0)
                .count(),
            first_year_rate_percent: schedule
                .years
                .first()
                .map(|y| y.effective_rate_percent)
                .unwrap_or(0.0),
            switch_year: schedule.switch_year,
            fully_depreciated_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depreciation::{generate, DepreciationParams};
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_summary() {
        let params = DepreciationParams {
            purchase_price: 300_000.0,
            land_value: 60_000.0,
            living_area: 80.0,
            model: DepreciationModel::Linear2,
            use_special_allowance: false,
            start_year: 2024,
        };
        let schedule = generate(&params, 30).unwrap();
        let summary = DepreciationSummary::from_schedule(&schedule, 42.0);

        assert_relative_eq!(summary.total_depreciation, 144_000.0, epsilon = 1e-6);
        assert_relative_eq!(summary.tax_saving, 60_480.0, epsilon = 1e-6);
        assert_relative_eq!(summary.average_effective_rate_percent, 2.0, epsilon = 1e-9);
        assert_relative_eq!(summary.first_year_rate_percent, 2.0, epsilon = 1e-9);
        assert_eq!(summary.special_allowance_years, 0);
        assert_eq!(summary.switch_year, None);
        assert_eq!(summary.fully_depreciated_year, None);
    }

    #[test]
    fn test_degressive_summary_reads_switch_year() {
        let params = DepreciationParams {
            purchase_price: 500_000.0,
            land_value: 100_000.0,
            living_area: 100.0,
            model: DepreciationModel::Degressive5,
            use_special_allowance: true,
            start_year: 2025,
        };
        let schedule = generate(&params, 31).unwrap();
        let summary = DepreciationSummary::from_schedule(&schedule, 35.0);

        assert_eq!(summary.switch_year, schedule.switch_year);
        assert_eq!(summary.switch_year, Some(2038));
        assert_eq!(summary.special_allowance_years, 4);
        // 5% declining balance plus 5% of min(400000, 400000)
        assert_relative_eq!(summary.first_year_rate_percent, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_exhausted_schedule_totals_building_value() {
        let params = DepreciationParams {
            purchase_price: 30_000.0,
            land_value: 0.0,
            living_area: 1000.0,
            model: DepreciationModel::Linear3,
            use_special_allowance: true,
            start_year: 2025,
        };
        let schedule = generate(&params, 40).unwrap();
        let summary = DepreciationSummary::from_schedule(&schedule, 40.0);

        assert_relative_eq!(summary.total_depreciation, 30_000.0, epsilon = 1e-6);
        assert_relative_eq!(summary.tax_saving, 12_000.0, epsilon = 1e-6);
        assert_eq!(summary.fully_depreciated_year, Some(2025 + 26));
    }

    #[test]
    fn test_empty_schedule() {
        let params = DepreciationParams {
            purchase_price: 0.0,
            land_value: 0.0,
            living_area: 0.0,
            model: DepreciationModel::Linear2,
            use_special_allowance: false,
            start_year: 2025,
        };
        let schedule = generate(&params, 0).unwrap();
        let summary = DepreciationSummary::from_schedule(&schedule, 40.0);
        assert_eq!(summary.total_depreciation, 0.0);
        assert_eq!(summary.average_effective_rate_percent, 0.0);
        assert_eq!(summary.first_year_rate_percent, 0.0);
    }
}

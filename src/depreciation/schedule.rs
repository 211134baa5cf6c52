//! Year-by-year depreciation schedule generation
//!
//! Amounts are accumulated at full precision. Rounding to cents happens only
//! when a schedule is exported or displayed.

use super::{DepreciationModel, DepreciationParams};
use crate::error::{ensure_horizon, ConfigError};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// Years the special allowance can be claimed
pub const SPECIAL_ALLOWANCE_YEARS: usize = 4;

/// Annual special allowance rate on the special allowance base
pub const SPECIAL_ALLOWANCE_RATE: f64 = 0.05;

/// Cap on the special allowance base per square metre of living area
pub const SPECIAL_ALLOWANCE_BASE_PER_SQM: f64 = 4000.0;

/// Useful life behind the straight-line fallback of the declining-balance method
pub const DEGRESSIVE_USEFUL_LIFE_YEARS: usize = 33;

/// Book value below this share of the building value counts as fully depreciated
const BOOK_VALUE_TOLERANCE: f64 = 1e-9;

/// Relative tolerance for the crossover comparison. With 20 years left the two
/// candidates are equal in exact arithmetic, and that tie must switch.
const CROSSOVER_TOLERANCE: f64 = 1e-12;

/// One year of a depreciation schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationYearRecord {
    /// Calendar year
    pub year: i32,
    /// Main method amount (straight-line or declining balance)
    pub linear_amount: f64,
    pub special_amount: f64,
    pub total_amount: f64,
    /// Book value after this year's depreciation
    pub remaining_book_value: f64,
    pub effective_rate_percent: f64,
    pub cumulative_amount: f64,
}

impl DepreciationYearRecord {
    fn exhausted(year: i32, cumulative_amount: f64) -> Self {
        Self {
            year,
            linear_amount: 0.0,
            special_amount: 0.0,
            total_amount: 0.0,
            remaining_book_value: 0.0,
            effective_rate_percent: 0.0,
            cumulative_amount,
        }
    }
}

/// Complete schedule for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationSchedule {
    pub model: DepreciationModel,
    pub building_value: f64,
    pub special_allowance_base: f64,
    /// Calendar year in which declining balance switched to straight-line.
    /// Only ever set for `degressive_5`; `None` if the switch never happened
    /// within the horizon.
    pub switch_year: Option<i32>,
    pub years: Vec<DepreciationYearRecord>,
}

impl DepreciationSchedule {
    pub fn total_depreciation(&self) -> f64 {
        self.years.iter().map(|y| y.total_amount).sum()
    }

    /// Record for a 0-based year index
    pub fn year_at(&self, index: usize) -> Option<&DepreciationYearRecord> {
        self.years.get(index)
    }
}

/// Declining-balance state carried across years
#[derive(Debug, Clone, Copy, Default)]
struct DegressiveState {
    /// Straight-line amount frozen at the crossover
    frozen_linear: Option<f64>,
}

impl DegressiveState {
    /// Main amount for year `index`, and whether this is the crossover year
    fn amount(&mut self, index: usize, remaining: f64) -> (f64, bool) {
        if let Some(frozen) = self.frozen_linear {
            return (frozen, false);
        }

        let degressive = DepreciationModel::Degressive5.nominal_rate() * remaining;
        let years_left = DEGRESSIVE_USEFUL_LIFE_YEARS.saturating_sub(index).max(1);
        let linear = remaining / years_left as f64;

        if linear >= degressive * (1.0 - CROSSOVER_TOLERANCE) {
            self.frozen_linear = Some(linear);
            (linear, true)
        } else {
            (degressive, false)
        }
    }
}

/// Generate `horizon_years` records of depreciation for `params`.
///
/// Once the book value reaches zero every later year is a zero record.
pub fn generate(
    params: &DepreciationParams,
    horizon_years: u32,
) -> Result<DepreciationSchedule, ConfigError> {
    params.validate()?;
    ensure_horizon(horizon_years, 1)?;

    let building_value = params.building_value();
    let horizon = horizon_years as usize;
    let mut years = Vec::with_capacity(horizon);

    let special_allowance_base = if params.use_special_allowance {
        (SPECIAL_ALLOWANCE_BASE_PER_SQM * params.living_area).min(building_value)
    } else {
        0.0
    };

    if building_value <= 0.0 {
        for index in 0..horizon {
            years.push(DepreciationYearRecord::exhausted(params.start_year + index as i32, 0.0));
        }
        return Ok(DepreciationSchedule {
            model: params.model,
            building_value: 0.0,
            special_allowance_base,
            switch_year: None,
            years,
        });
    }

    let mut remaining = building_value;
    let mut cumulative = 0.0;
    let mut degressive = DegressiveState::default();
    let mut switch_year = None;

    for index in 0..horizon {
        let year = params.start_year + index as i32;

        if remaining <= 0.0 {
            years.push(DepreciationYearRecord::exhausted(year, cumulative));
            continue;
        }

        let mut special = if params.use_special_allowance && index < SPECIAL_ALLOWANCE_YEARS {
            (SPECIAL_ALLOWANCE_RATE * special_allowance_base).min(remaining)
        } else {
            0.0
        };

        let mut main = match params.model {
            DepreciationModel::Linear2 | DepreciationModel::Linear3 => {
                params.model.nominal_rate() * building_value
            }
            DepreciationModel::Degressive5 => {
                let (amount, switched_now) = degressive.amount(index, remaining);
                if switched_now {
                    debug!(
                        "Declining balance switches to straight-line in {} at {:.2}",
                        year, amount
                    );
                    switch_year = Some(year);
                }
                amount
            }
        };

        // Clamp to the book value, scaling both parts by the same factor
        let unclamped = main + special;
        let mut total = if unclamped > remaining {
            let factor = remaining / unclamped;
            main *= factor;
            special *= factor;
            trace!("Book value exhausted in {}, scaling by {:.6}", year, factor);
            remaining
        } else {
            unclamped
        };

        // A rounding residue left after this year goes to the main amount
        let residue = remaining - total;
        if residue <= BOOK_VALUE_TOLERANCE * building_value {
            main += residue;
            total = remaining;
            cumulative = building_value;
            remaining = 0.0;
        } else {
            cumulative += total;
            remaining = (building_value - cumulative).max(0.0);
        }

        years.push(DepreciationYearRecord {
            year,
            linear_amount: main,
            special_amount: special,
            total_amount: total,
            remaining_book_value: remaining,
            effective_rate_percent: total / building_value * 100.0,
            cumulative_amount: cumulative,
        });
    }

    Ok(DepreciationSchedule {
        model: params.model,
        building_value,
        special_allowance_base,
        switch_year,
        years,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(model: DepreciationModel, use_special_allowance: bool) -> DepreciationParams {
        DepreciationParams {
            purchase_price: 300_000.0,
            land_value: 60_000.0,
            living_area: 80.0,
            model,
            use_special_allowance,
            start_year: 2024,
        }
    }

    fn assert_book_value_invariants(schedule: &DepreciationSchedule) {
        let mut previous = schedule.building_value;
        let mut sum = 0.0;
        for record in &schedule.years {
            assert!(record.remaining_book_value >= 0.0);
            assert!(record.remaining_book_value <= previous + 1e-9);
            assert!(record.cumulative_amount <= schedule.building_value + 1e-6);
            previous = record.remaining_book_value;
            sum += record.total_amount;
            assert_relative_eq!(record.cumulative_amount, sum, epsilon = 1e-6);
            assert_relative_eq!(
                record.cumulative_amount + record.remaining_book_value,
                schedule.building_value,
                epsilon = 1e-6
            );
        }
        assert!(sum <= schedule.building_value + 1e-6);
    }

    #[test]
    fn test_linear_2_constant_amount() {
        let schedule = generate(&params(DepreciationModel::Linear2, false), 30).unwrap();

        assert_eq!(schedule.years.len(), 30);
        assert_eq!(schedule.building_value, 240_000.0);
        for record in &schedule.years {
            assert_relative_eq!(record.total_amount, 4800.0, epsilon = 1e-9);
            assert_relative_eq!(record.effective_rate_percent, 2.0, epsilon = 1e-9);
            assert_eq!(record.special_amount, 0.0);
        }
        assert_eq!(schedule.years[0].year, 2024);
        assert_eq!(schedule.years[29].year, 2053);
        assert_relative_eq!(schedule.years[29].remaining_book_value, 96_000.0, epsilon = 1e-6);
        assert_eq!(schedule.switch_year, None);
    }

    #[test]
    fn test_linear_3_runs_out_after_34_years() {
        let schedule = generate(&params(DepreciationModel::Linear3, false), 40).unwrap();

        // 33 full years of 7200, then the 2400 remainder, then nothing
        for record in &schedule.years[..33] {
            assert_relative_eq!(record.total_amount, 7200.0, epsilon = 1e-9);
        }
        assert_relative_eq!(schedule.years[33].total_amount, 2400.0, epsilon = 1e-6);
        assert_eq!(schedule.years[33].remaining_book_value, 0.0);
        for record in &schedule.years[34..] {
            assert_eq!(record.total_amount, 0.0);
            assert_eq!(record.remaining_book_value, 0.0);
        }
        assert_relative_eq!(schedule.total_depreciation(), 240_000.0, epsilon = 1e-6);
        assert_book_value_invariants(&schedule);
    }

    #[test]
    fn test_degressive_crossover() {
        let schedule = generate(&params(DepreciationModel::Degressive5, false), 40).unwrap();
        assert_book_value_invariants(&schedule);

        // 5% of remaining <= remaining / (33 - i) first holds at i = 13
        assert_eq!(schedule.switch_year, Some(2024 + 13));

        assert_relative_eq!(schedule.years[0].linear_amount, 12_000.0, epsilon = 1e-9);
        for pair in schedule.years[..13].windows(2) {
            assert!(pair[1].linear_amount < pair[0].linear_amount);
        }

        let book_before_switch = schedule.years[12].remaining_book_value;
        let frozen = book_before_switch / 20.0;
        for record in &schedule.years[13..33] {
            assert_relative_eq!(record.linear_amount, frozen, epsilon = 1e-6);
        }
        // Twenty frozen years use up the book value exactly
        assert!(schedule.years[32].remaining_book_value < 1e-6);
        for record in &schedule.years[33..] {
            assert_eq!(record.total_amount, 0.0);
        }
    }

    #[test]
    fn test_degressive_frozen_amount_ignores_later_book_value() {
        let mut p = params(DepreciationModel::Degressive5, true);
        p.living_area = 60.0;
        let schedule = generate(&p, 20).unwrap();

        let switch_index = (schedule.switch_year.unwrap() - p.start_year) as usize;
        assert_eq!(switch_index, 13);
        let frozen = schedule.years[switch_index].linear_amount;
        for record in &schedule.years[switch_index..] {
            assert_eq!(record.linear_amount, frozen);
        }
    }

    #[test]
    fn test_special_allowance_first_four_years() {
        let schedule = generate(&params(DepreciationModel::Linear2, true), 10).unwrap();

        // Base = min(4000 * 80, 240000) = 240000, 5% per year
        assert_eq!(schedule.special_allowance_base, 240_000.0);
        for record in &schedule.years[..4] {
            assert_relative_eq!(record.special_amount, 12_000.0, epsilon = 1e-9);
            assert_relative_eq!(record.total_amount, 16_800.0, epsilon = 1e-9);
        }
        for record in &schedule.years[4..] {
            assert_eq!(record.special_amount, 0.0);
            assert_relative_eq!(record.total_amount, 4800.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_special_allowance_base_capped_by_area() {
        let mut p = params(DepreciationModel::Linear2, true);
        p.living_area = 50.0;
        let schedule = generate(&p, 4).unwrap();
        assert_eq!(schedule.special_allowance_base, 200_000.0);
        assert_relative_eq!(schedule.years[0].special_amount, 10_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_exhaustion_scales_both_components() {
        // Small building value with a disproportionate allowance base
        let p = DepreciationParams {
            purchase_price: 30_000.0,
            land_value: 0.0,
            living_area: 1000.0,
            model: DepreciationModel::Linear3,
            use_special_allowance: true,
            start_year: 2025,
        };
        let schedule = generate(&p, 30).unwrap();

        // Base = min(4_000_000, 30_000) = 30_000; per year 900 linear + 1500 special
        assert_relative_eq!(schedule.years[0].total_amount, 2400.0, epsilon = 1e-9);
        // 9600 after four years leaves 20400: 22 more full years and a 600 remainder
        let exhausted_at = schedule
            .years
            .iter()
            .position(|y| y.remaining_book_value == 0.0)
            .unwrap();
        assert_eq!(exhausted_at, 26);
        assert_relative_eq!(schedule.years[26].total_amount, 600.0, epsilon = 1e-6);
        for record in &schedule.years[exhausted_at + 1..] {
            assert_eq!(record.total_amount, 0.0);
            assert_eq!(record.remaining_book_value, 0.0);
        }
        assert_relative_eq!(schedule.total_depreciation(), 30_000.0, epsilon = 1e-6);
        assert_book_value_invariants(&schedule);
    }

    #[test]
    fn test_final_year_takes_remaining_book_value() {
        let p = DepreciationParams {
            purchase_price: 10_000.0,
            land_value: 0.0,
            living_area: 10.0,
            model: DepreciationModel::Degressive5,
            use_special_allowance: true,
            start_year: 2025,
        };
        let schedule = generate(&p, 60).unwrap();
        let last = schedule
            .years
            .iter()
            .rev()
            .find(|y| y.total_amount > 0.0)
            .unwrap();
        assert_eq!(last.remaining_book_value, 0.0);
        assert_eq!(last.special_amount, 0.0);
        assert_relative_eq!(last.linear_amount, last.total_amount, epsilon = 1e-9);
        assert_relative_eq!(last.cumulative_amount, 10_000.0, epsilon = 1e-9);
        assert_relative_eq!(schedule.total_depreciation(), 10_000.0, epsilon = 1e-6);
        assert_book_value_invariants(&schedule);
    }

    #[test]
    fn test_tiny_building_value_is_not_snapped() {
        let mut tiny = params(DepreciationModel::Linear2, false);
        tiny.purchase_price = 5e-7;
        tiny.land_value = 0.0;
        let schedule = generate(&tiny, 3).unwrap();

        let first = &schedule.years[0];
        assert_relative_eq!(first.total_amount, 1e-8, max_relative = 1e-9);
        assert_relative_eq!(first.remaining_book_value, 4.9e-7, max_relative = 1e-9);
        assert_relative_eq!(first.cumulative_amount, first.total_amount, max_relative = 1e-9);
        assert!(schedule.years[2].remaining_book_value > 0.0);
    }

    #[test]
    fn test_zero_building_value() {
        let p = DepreciationParams {
            purchase_price: 50_000.0,
            land_value: 80_000.0,
            ..params(DepreciationModel::Degressive5, true)
        };
        let schedule = generate(&p, 5).unwrap();
        assert_eq!(schedule.years.len(), 5);
        assert_eq!(schedule.building_value, 0.0);
        for record in &schedule.years {
            assert_eq!(record.total_amount, 0.0);
            assert_eq!(record.effective_rate_percent, 0.0);
            assert_eq!(record.remaining_book_value, 0.0);
        }
    }

    #[test]
    fn test_zero_horizon() {
        let schedule = generate(&params(DepreciationModel::Linear2, false), 0).unwrap();
        assert!(schedule.years.is_empty());
    }

    #[test]
    fn test_invalid_living_area_rejected() {
        let mut p = params(DepreciationModel::Linear2, false);
        p.living_area = -20.0;
        assert!(matches!(generate(&p, 10), Err(ConfigError::InvalidLivingArea(_))));
    }

    #[test]
    fn test_generation_is_idempotent() {
        let p = params(DepreciationModel::Degressive5, true);
        assert_eq!(generate(&p, 31).unwrap(), generate(&p, 31).unwrap());
    }
}

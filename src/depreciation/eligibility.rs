//! Legal availability of depreciation models and the special allowance
//!
//! Pure predicate over the facts of a property. Cheap enough to run on every
//! edit of the input form.

use super::DepreciationModel;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// First purchase year for the 3% straight-line rate
pub const LINEAR_3_FIRST_YEAR: i32 = 2023;

/// Construction cost ceiling per square metre for the special allowance
pub const SPECIAL_ALLOWANCE_COST_CEILING: f64 = 5200.0;

/// Energy standard required for the special allowance
pub const REQUIRED_ENERGY_STANDARD: &str = "EH40";

/// Start of the declining-balance window (inclusive)
pub fn degressive_window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 1).expect("valid calendar date")
}

/// End of the declining-balance window (exclusive)
pub fn degressive_window_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2029, 10, 1).expect("valid calendar date")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyType {
    Existing,
    NewBuild,
}

/// Legal and physical facts about a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityFacts {
    pub property_type: PropertyType,
    pub purchase_date: NaiveDate,
    /// Date the building application was filed; falls back to the purchase date
    #[serde(default)]
    pub construction_application_date: Option<NaiveDate>,
    #[serde(default)]
    pub energy_standard: String,
    #[serde(default)]
    pub has_quality_seal: bool,
    pub purchase_price: f64,
    pub living_area: f64,
}

impl EligibilityFacts {
    /// Date that decides the declining-balance window
    pub fn reference_date(&self) -> NaiveDate {
        self.construction_application_date.unwrap_or(self.purchase_date)
    }

    /// Purchase price per square metre, `None` for a non-positive area
    pub fn cost_per_sqm(&self) -> Option<f64> {
        if self.living_area > 0.0 {
            Some(self.purchase_price / self.living_area)
        } else {
            None
        }
    }
}

/// Why a model (or the special allowance) is not available
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "code")]
pub enum IneligibilityReason {
    PurchasedBefore2023,
    NotNewBuild,
    OutsideDegressiveWindow,
    NotEh40,
    NoQualitySeal,
    /// `cost_per_sqm` is `None` when the living area is not positive
    CostCeilingExceeded { cost_per_sqm: Option<f64> },
}

impl fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IneligibilityReason::PurchasedBefore2023 => {
                write!(
                    f,
                    "3% straight-line requires a purchase in {} or later",
                    LINEAR_3_FIRST_YEAR
                )
            }
            IneligibilityReason::NotNewBuild => f.write_str("only available for new builds"),
            IneligibilityReason::OutsideDegressiveWindow => {
                f.write_str("construction application must fall between Oct 2023 and Sep 2029")
            }
            IneligibilityReason::NotEh40 => {
                write!(f, "requires energy standard {}", REQUIRED_ENERGY_STANDARD)
            }
            IneligibilityReason::NoQualitySeal => {
                f.write_str("requires a sustainability quality seal")
            }
            IneligibilityReason::CostCeilingExceeded { cost_per_sqm: Some(cost) } => write!(
                f,
                "cost of {:.2} per m² exceeds the ceiling of {:.0}",
                cost, SPECIAL_ALLOWANCE_COST_CEILING
            ),
            IneligibilityReason::CostCeilingExceeded { cost_per_sqm: None } => {
                f.write_str("cost per m² cannot be determined without a living area")
            }
        }
    }
}

/// Availability flags with exactly one reason per unavailable option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResult {
    #[serde(rename = "linear_2")]
    pub linear_2: bool,
    #[serde(rename = "linear_3")]
    pub linear_3: bool,
    #[serde(rename = "degressive_5")]
    pub degressive_5: bool,
    pub special_allowance: bool,
    pub linear_3_reason: Option<IneligibilityReason>,
    pub degressive_5_reason: Option<IneligibilityReason>,
    pub special_allowance_reason: Option<IneligibilityReason>,
}

impl EligibilityResult {
    pub fn allows(&self, model: DepreciationModel) -> bool {
        match model {
            DepreciationModel::Linear2 => self.linear_2,
            DepreciationModel::Linear3 => self.linear_3,
            DepreciationModel::Degressive5 => self.degressive_5,
        }
    }

    pub fn reason(&self, model: DepreciationModel) -> Option<IneligibilityReason> {
        match model {
            DepreciationModel::Linear2 => None,
            DepreciationModel::Linear3 => self.linear_3_reason,
            DepreciationModel::Degressive5 => self.degressive_5_reason,
        }
    }

    pub fn available_models(&self) -> Vec<DepreciationModel> {
        DepreciationModel::ALL
            .into_iter()
            .filter(|m| self.allows(*m))
            .collect()
    }
}

/// Report which depreciation options the facts legally permit
pub fn evaluate(facts: &EligibilityFacts) -> EligibilityResult {
    let linear_3_reason = if facts.purchase_date.year() >= LINEAR_3_FIRST_YEAR {
        None
    } else {
        Some(IneligibilityReason::PurchasedBefore2023)
    };

    let degressive_5_reason = degressive_precondition(facts);
    let special_allowance_reason =
        degressive_5_reason.or_else(|| special_allowance_precondition(facts));

    EligibilityResult {
        linear_2: true,
        linear_3: linear_3_reason.is_none(),
        degressive_5: degressive_5_reason.is_none(),
        special_allowance: special_allowance_reason.is_none(),
        linear_3_reason,
        degressive_5_reason,
        special_allowance_reason,
    }
}

fn degressive_precondition(facts: &EligibilityFacts) -> Option<IneligibilityReason> {
    if facts.property_type != PropertyType::NewBuild {
        return Some(IneligibilityReason::NotNewBuild);
    }
    let date = facts.reference_date();
    if date < degressive_window_start() || date >= degressive_window_end() {
        return Some(IneligibilityReason::OutsideDegressiveWindow);
    }
    None
}

// Checked in order after the degressive window; only the first failure counts
fn special_allowance_precondition(facts: &EligibilityFacts) -> Option<IneligibilityReason> {
    if !facts.energy_standard.trim().eq_ignore_ascii_case(REQUIRED_ENERGY_STANDARD) {
        return Some(IneligibilityReason::NotEh40);
    }
    if !facts.has_quality_seal {
        return Some(IneligibilityReason::NoQualitySeal);
    }
    match facts.cost_per_sqm() {
        Some(cost) if cost <= SPECIAL_ALLOWANCE_COST_CEILING => None,
        cost_per_sqm => Some(IneligibilityReason::CostCeilingExceeded { cost_per_sqm }),
    }
}

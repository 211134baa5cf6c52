//! Depreciation model selection and schedule inputs

use crate::error::{ensure_finite, ConfigError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Statutory depreciation method for the building share of a purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum DepreciationModel {
    /// 2% straight-line
    #[serde(rename = "linear_2")]
    Linear2,
    /// 3% straight-line (purchases from 2023)
    #[serde(rename = "linear_3")]
    Linear3,
    /// 5% declining balance, switching to straight-line once that is larger
    #[serde(rename = "degressive_5")]
    Degressive5,
}

impl DepreciationModel {
    pub const ALL: [DepreciationModel; 3] = [
        DepreciationModel::Linear2,
        DepreciationModel::Linear3,
        DepreciationModel::Degressive5,
    ];

    /// Wire name, e.g. "degressive_5"
    pub fn as_str(&self) -> &'static str {
        match self {
            DepreciationModel::Linear2 => "linear_2",
            DepreciationModel::Linear3 => "linear_3",
            DepreciationModel::Degressive5 => "degressive_5",
        }
    }

    /// Nominal annual rate as a fraction (0.02, 0.03, 0.05)
    pub fn nominal_rate(&self) -> f64 {
        match self {
            DepreciationModel::Linear2 => 0.02,
            DepreciationModel::Linear3 => 0.03,
            DepreciationModel::Degressive5 => 0.05,
        }
    }
}

impl fmt::Display for DepreciationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepreciationModel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "linear_2" => Ok(DepreciationModel::Linear2),
            "linear_3" => Ok(DepreciationModel::Linear3),
            "degressive_5" => Ok(DepreciationModel::Degressive5),
            other => Err(ConfigError::UnknownModel(other.to_string())),
        }
    }
}

impl TryFrom<String> for DepreciationModel {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Inputs for a depreciation schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationParams {
    /// Total purchase price including land
    pub purchase_price: f64,

    /// Land share of the purchase price (not depreciable)
    pub land_value: f64,

    /// Living area in square metres
    pub living_area: f64,

    pub model: DepreciationModel,

    /// Claim the 4-year special allowance on top of the main method
    #[serde(default)]
    pub use_special_allowance: bool,

    /// Calendar year of the first depreciation year
    pub start_year: i32,
}

impl DepreciationParams {
    /// Depreciable base: purchase price minus land, never negative
    pub fn building_value(&self) -> f64 {
        (self.purchase_price - self.land_value).max(0.0)
    }

    /// Reject inputs that cannot describe a real property.
    ///
    /// Zero or negative prices are accepted; they yield an all-zero schedule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite("purchase_price", self.purchase_price)?;
        ensure_finite("land_value", self.land_value)?;
        if !self.living_area.is_finite() || self.living_area < 0.0 {
            return Err(ConfigError::InvalidLivingArea(self.living_area));
        }
        Ok(())
    }
}

//! Error types for configuration and export failures

use thiserror::Error;

/// Longest horizon the engine will project
pub const MAX_HORIZON_YEARS: u32 = 100;

/// Structurally impossible input, rejected before any computation runs.
///
/// Degenerate but valid inputs (zero prices, zero interest, zero horizon)
/// are not errors and produce flat series instead.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("living area must be a non-negative number, got {0}")]
    InvalidLivingArea(f64),
    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },
    #[error("horizon of {0} years exceeds the supported maximum of {max}", max = MAX_HORIZON_YEARS)]
    HorizonTooLong(u32),
    #[error("unrecognized depreciation model: {0}")]
    UnknownModel(String),
    #[error("unrecognized loan type: {0}")]
    UnknownLoanType(String),
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while writing a series to CSV
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reject NaN and infinities for a named input field
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

/// Reject horizons beyond the supported maximum plus `extra_years`
pub(crate) fn ensure_horizon(horizon_years: u32, extra_years: u32) -> Result<(), ConfigError> {
    if horizon_years > MAX_HORIZON_YEARS + extra_years {
        Err(ConfigError::HorizonTooLong(horizon_years))
    } else {
        Ok(())
    }
}

//! Property Projection - depreciation and cashflow forecasting for residential property purchases
//!
//! This library provides:
//! - Eligibility checks for the statutory depreciation models and special allowance
//! - Year-by-year tax depreciation schedules (straight-line and declining balance)
//! - Annuity and declining-balance loan amortization with inflation-adjusted cashflows
//! - Summary KPIs, CSV export and parallel scenario evaluation

pub mod error;
pub mod depreciation;
pub mod projection;
pub mod scenario;
pub mod export;

// Re-export commonly used types
pub use error::{ConfigError, ExportError};
pub use depreciation::{
    evaluate, generate, DepreciationModel, DepreciationParams, DepreciationSchedule,
    DepreciationSummary, EligibilityFacts, EligibilityResult,
};
pub use projection::{
    project, ProjectionConfig, ProjectionResult, ProjectionSummary, ProjectionYearRecord,
};

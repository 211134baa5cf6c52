//! Loan amortization and cashflow projection over a multi-year horizon

mod inputs;
mod engine;
mod cashflows;
mod summary;

pub use inputs::{
    LoanProjectionInput, LoanType, ProjectionConfig, RentCostInput, SaleInput, TaxInput,
    DEFAULT_HORIZON_YEARS, DEFAULT_LEGACY_DEPRECIATION_YEARS,
};
pub use engine::{annuity_monthly_payment, project};
pub use cashflows::{ProjectionResult, ProjectionYearRecord};
pub use summary::{KeyFigures, ProjectionSummary};

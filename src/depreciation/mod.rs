//! Tax depreciation: model eligibility, schedule generation and schedule summaries

mod params;
pub mod eligibility;
pub mod schedule;
mod summary;

pub use params::{DepreciationModel, DepreciationParams};
pub use eligibility::{
    evaluate, EligibilityFacts, EligibilityResult, IneligibilityReason, PropertyType,
};
pub use schedule::{generate, DepreciationSchedule, DepreciationYearRecord};
pub use summary::DepreciationSummary;

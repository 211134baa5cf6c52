//! Parallel evaluation of several projections or depreciation models
//!
//! Every run is independent, so configurations are fanned out with rayon and
//! results come back in input order.

use crate::depreciation::{
    evaluate, generate, DepreciationModel, DepreciationParams, DepreciationSchedule,
    DepreciationSummary, EligibilityFacts,
};
use crate::error::ConfigError;
use crate::projection::{project, ProjectionConfig, ProjectionResult};
use log::debug;
use rayon::prelude::*;
use serde::Serialize;

/// Schedule and summary for one eligible model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelComparison {
    pub model: DepreciationModel,
    pub special_allowance_applied: bool,
    pub schedule: DepreciationSchedule,
    pub summary: DepreciationSummary,
}

/// Project every configuration, preserving order
pub fn project_all(configs: &[ProjectionConfig]) -> Vec<Result<ProjectionResult, ConfigError>> {
    debug!("Projecting {} scenarios", configs.len());
    configs.par_iter().map(project).collect()
}

/// Build a schedule for every model the facts make available.
///
/// The special allowance is only applied when requested in `base` and
/// legally available.
pub fn compare_models(
    base: &DepreciationParams,
    facts: &EligibilityFacts,
    horizon_years: u32,
    marginal_tax_rate_percent: f64,
) -> Result<Vec<ModelComparison>, ConfigError> {
    let eligibility = evaluate(facts);
    let use_special_allowance = base.use_special_allowance && eligibility.special_allowance;

    if base.use_special_allowance && !use_special_allowance {
        if let Some(reason) = eligibility.special_allowance_reason {
            debug!("Special allowance dropped from comparison: {}", reason);
        }
    }

    eligibility
        .available_models()
        .par_iter()
        .map(|model| -> Result<ModelComparison, ConfigError> {
            let params = DepreciationParams {
                model: *model,
                use_special_allowance,
                ..base.clone()
            };
            let schedule = generate(&params, horizon_years)?;
            let summary = DepreciationSummary::from_schedule(&schedule, marginal_tax_rate_percent);
            Ok(ModelComparison {
                model: *model,
                special_allowance_applied: use_special_allowance,
                schedule,
                summary,
            })
        })
        .collect()
}

/// Comparison with the largest total depreciation over the horizon
pub fn best_model(comparisons: &[ModelComparison]) -> Option<&ModelComparison> {
    comparisons
        .iter()
        .max_by(|a, b| a.summary.total_depreciation.total_cmp(&b.summary.total_depreciation))
}

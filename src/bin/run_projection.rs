//! Run a projection from a JSON scenario file
//!
//! Prints the yearly cashflow table and summary, optionally checks eligibility
//! and compares depreciation models, and writes CSV output.

use anyhow::{Context, Result};
use clap::Parser;
use property_projection::depreciation::{evaluate, EligibilityFacts};
use property_projection::export::{write_projection_csv, write_schedule_csv};
use property_projection::projection::{project, ProjectionConfig, ProjectionSummary};
use property_projection::scenario::{best_model, compare_models};
use std::fs::{self, File};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(
    name = "run_projection",
    about = "Depreciation and cashflow projection for a property purchase"
)]
struct Args {
    /// Scenario configuration (JSON)
    #[arg(short, long)]
    config: PathBuf,

    /// Write the yearly projection to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the depreciation schedule to this CSV file
    #[arg(long)]
    schedule_output: Option<PathBuf>,

    /// Property facts (JSON) for the eligibility check and model comparison
    #[arg(long)]
    facts: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let config = ProjectionConfig::from_json_path(&args.config)
        .with_context(|| format!("loading scenario {}", args.config.display()))?;

    let result = project(&config).context("projection failed")?;
    let summary = ProjectionSummary::from_result(&result, &config);
    log::info!("Projected {} years in {:?}", config.horizon_years(), start.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Year | Balance      | Interest   | Principal  | CF pre-tax | Tax      | CF after-tax | Equity");
        for row in &result.years {
            println!(
                "{:4} | {:12.2} | {:10.2} | {:10.2} | {:10.2} | {:8.2} | {:12.2} | {:.2}",
                row.year,
                row.remaining_principal,
                row.annual_interest,
                row.total_principal_paid,
                row.monthly_cashflow_pre_tax,
                row.tax_monthly,
                row.monthly_cashflow_after_tax,
                row.total_equity,
            );
        }

        println!("\nSummary:");
        if let Some(payment) = result.fixed_monthly_payment {
            println!("  Fixed monthly payment:      {:.2}", payment);
        }
        println!("  Total interest:             {:.2}", summary.total_interest);
        println!("  Total principal repaid:     {:.2}", summary.total_principal_repaid);
        println!("  Remaining principal at end: {:.2}", summary.final_remaining_principal);
        println!("  Cumulative CF after tax:    {:.2}", summary.cumulative_cashflow_after_tax);
        println!("  Total depreciation:         {:.2}", summary.total_depreciation);
        if let Some(depreciation) = &summary.depreciation {
            println!("  Depreciation tax saving:    {:.2}", depreciation.tax_saving);
            if let Some(year) = depreciation.switch_year {
                println!("  Switch to straight-line:    {}", year);
            }
        }
        if let Some(proceeds) = summary.final_net_sale_proceeds {
            println!("  Net sale proceeds at end:   {:.2}", proceeds);
        }
        let figures = &summary.key_figures;
        if let Some(dscr) = figures.debt_service_coverage_ratio {
            println!("  DSCR (year 0):              {:.2}", dscr);
        }
        if let Some(yield_pct) = figures.gross_rental_yield_percent {
            println!("  Gross rental yield:         {:.2}%", yield_pct);
        }
    }

    if let Some(facts_path) = &args.facts {
        let contents = fs::read_to_string(facts_path)
            .with_context(|| format!("reading facts {}", facts_path.display()))?;
        let facts: EligibilityFacts =
            serde_json::from_str(&contents).context("parsing property facts")?;

        let eligibility = evaluate(&facts);
        println!("\nEligibility:");
        println!("  linear_2:          yes");
        for (label, allowed, reason) in [
            ("linear_3", eligibility.linear_3, eligibility.linear_3_reason),
            ("degressive_5", eligibility.degressive_5, eligibility.degressive_5_reason),
            (
                "special allowance",
                eligibility.special_allowance,
                eligibility.special_allowance_reason,
            ),
        ] {
            match (allowed, reason) {
                (true, _) => println!("  {:<18} yes", format!("{}:", label)),
                (false, Some(reason)) => {
                    println!("  {:<18} no ({})", format!("{}:", label), reason)
                }
                (false, None) => println!("  {:<18} no", format!("{}:", label)),
            }
        }

        if let Some(base) = &config.depreciation {
            let comparisons = compare_models(
                base,
                &facts,
                config.horizon_years() + 1,
                config.tax.marginal_tax_rate_percent,
            )?;
            println!("\nModel comparison:");
            for comparison in &comparisons {
                println!(
                    "  {:<13} total {:12.2}  tax saving {:12.2}  year-1 rate {:.2}%",
                    comparison.model.as_str(),
                    comparison.summary.total_depreciation,
                    comparison.summary.tax_saving,
                    comparison.summary.first_year_rate_percent,
                );
            }
            if let Some(best) = best_model(&comparisons) {
                println!("  Highest depreciation: {}", best.model);
            }
        }
    }

    if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_projection_csv(&result.years, file)?;
        println!("\nProjection written to {}", path.display());
    }

    if let Some(path) = &args.schedule_output {
        match &result.depreciation_schedule {
            Some(schedule) => {
                let file = File::create(path)
                    .with_context(|| format!("creating {}", path.display()))?;
                write_schedule_csv(schedule, file)?;
                println!("Depreciation schedule written to {}", path.display());
            }
            None => log::warn!("No depreciation parameters in scenario, schedule not written"),
        }
    }

    Ok(())
}

//! Compare every preset career under each plan
//!
//! Outputs total paid, clearance and verdict per career and plan for a
//! typical loan, written to career_comparison.csv

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use serde::Serialize;

use student_loan_system::{
    assumptions::loader::DEFAULT_ASSUMPTIONS_PATH,
    career::CAREER_TEMPLATES,
    projection::LoanInputs,
    Assumptions, LoanError, PlanType, SalaryProfile, ScenarioRunner,
};

#[derive(Debug, Parser)]
#[command(about = "Project every preset career under every plan")]
struct Args {
    /// Course start year
    #[arg(long, default_value_t = 2013)]
    start_year: i32,

    /// Course length in years
    #[arg(long, default_value_t = 3)]
    course_years: u32,

    /// Amount borrowed (defaults to the typical loan for the start year)
    #[arg(long)]
    loan: Option<f64>,

    /// Directory holding the assumption CSVs (defaults to data/assumptions, or the
    /// embedded tables when that directory is missing)
    #[arg(long, value_name = "DIR")]
    assumptions: Option<PathBuf>,

    /// Output CSV path
    #[arg(long, default_value = "career_comparison.csv")]
    output: String,
}

/// One output row
#[derive(Debug, Serialize)]
struct ComparisonRow<'a> {
    plan: &'a str,
    career: &'a str,
    total_paid: f64,
    cleared_age: Option<u32>,
    amount_written_off: f64,
    good_deal: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let assumptions = match &args.assumptions {
        Some(dir) => Assumptions::from_csv_path(dir)
            .with_context(|| format!("loading assumptions from {}", dir.display()))?,
        None => load_or_embedded(Path::new(DEFAULT_ASSUMPTIONS_PATH))?,
    };
    let loan = args
        .loan
        .unwrap_or_else(|| assumptions.tuition.typical_loan_amount(args.start_year));
    let runner = ScenarioRunner::with_assumptions(assumptions);

    let start = Instant::now();
    let mut writer = csv::Writer::from_path(&args.output).with_context(|| format!("creating {}", args.output))?;

    for plan in PlanType::ALL {
        // Career profiles replace this placeholder salary
        let inputs = LoanInputs::new(loan, SalaryProfile::constant(0.0)?, args.start_year, plan, args.course_years)?;
        let outcomes = runner.compare_careers(&inputs, CAREER_TEMPLATES);

        println!("\n{} ({}), £{:.0} borrowed in {}:", plan, plan.cohort(), loan, args.start_year);
        for outcome in &outcomes {
            println!(
                "  {:<22} paid £{:>8.0}  {:<14} {}",
                outcome.name,
                outcome.total_paid,
                outcome
                    .cleared_age
                    .map_or(format!("w/o £{:.0}", outcome.amount_written_off), |a| format!("cleared {}", a)),
                if outcome.is_good_deal { "good deal" } else { "bad deal" },
            );
            writer.serialize(ComparisonRow {
                plan: plan.id(),
                career: &outcome.id,
                total_paid: outcome.total_paid,
                cleared_age: outcome.cleared_age,
                amount_written_off: outcome.amount_written_off,
                good_deal: outcome.is_good_deal,
            })?;
        }
    }

    writer.flush()?;
    println!("\nComparison written to {} in {:?}", args.output, start.elapsed());
    Ok(())
}

/// Load the CSV assumptions, using the embedded tables only when a file is missing
///
/// Any other failure (bad rows, invalid plan tables) is an error: a comparison
/// built from different numbers than the files on disk would be misleading.
fn load_or_embedded(dir: &Path) -> Result<Assumptions> {
    match Assumptions::from_csv_path(dir) {
        Ok(assumptions) => Ok(assumptions),
        Err(LoanError::Io { path, source }) if source.kind() == ErrorKind::NotFound => {
            warn!("{} not found, using embedded assumptions", path);
            Ok(Assumptions::default_uk())
        }
        Err(e) => Err(e).with_context(|| format!("loading assumptions from {}", dir.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("student_loan_{}_{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_directory_uses_embedded_tables() {
        let assumptions = load_or_embedded(Path::new("no/such/assumptions")).unwrap();
        assert_eq!(assumptions, Assumptions::default_uk());
    }

    #[test]
    fn test_broken_plan_table_is_an_error() {
        let dir = scratch_dir("broken_plans");
        fs::write(
            dir.join("plan_parameters.csv"),
            "plan,threshold,upper_threshold,repayment_rate,interest_rate,base_rate,max_rate,write_off_years\n\
             plan1,24990,,0.09,0.043,,,25\n",
        )
        .unwrap();

        let err = load_or_embedded(&dir).unwrap_err();
        assert!(matches!(err.downcast_ref::<LoanError>(), Some(LoanError::InvalidPlanTable(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}

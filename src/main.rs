//! Student Loan CLI
//!
//! Command-line interface for running a single repayment projection

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::Parser;
use log::{info, warn};

use student_loan_system::{
    career::{self, load_milestones, CAREER_TEMPLATES},
    projection::{LoanInputs, ProjectionResult},
    Assumptions, PlanType, SalaryMilestone, SalaryProfile, ScenarioRunner,
};

#[derive(Debug, Parser)]
#[command(name = "student-loan", version, about = "Project UK student loan repayments and compare against a personal loan")]
struct Args {
    /// Repayment plan: plan1, plan2, plan4 or plan5
    #[arg(long, default_value = "plan2")]
    plan: PlanType,

    /// Year the course starts (defaults to the current year)
    #[arg(long)]
    start_year: Option<i32>,

    /// Course length in years
    #[arg(long, default_value_t = 4)]
    course_years: u32,

    /// Total amount borrowed (defaults to typical tuition plus maintenance for the start year)
    #[arg(long)]
    loan: Option<f64>,

    /// Preset career id (see --list-careers)
    #[arg(long, default_value = "nursing", conflicts_with_all = ["milestone", "milestones"])]
    career: String,

    /// Custom salary milestone as AGE:SALARY, repeatable
    #[arg(long, value_name = "AGE:SALARY", conflicts_with = "milestones")]
    milestone: Vec<SalaryMilestone>,

    /// CSV file of age,salary milestones
    #[arg(long, value_name = "FILE")]
    milestones: Option<PathBuf>,

    /// Directory holding plan_parameters.csv, historical_rates.csv and tuition_fees.csv
    #[arg(long, value_name = "DIR")]
    assumptions: Option<PathBuf>,

    /// Write the year-by-year ledger to this CSV file
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the full result as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Also compare the same loan across every preset career
    #[arg(long)]
    compare: bool,

    /// List preset careers and exit
    #[arg(long)]
    list_careers: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_careers {
        for c in CAREER_TEMPLATES {
            println!("{:<22} {}", c.id, c.name);
        }
        return Ok(());
    }

    let assumptions = match &args.assumptions {
        Some(dir) => Assumptions::from_csv_path(dir)
            .with_context(|| format!("loading assumptions from {}", dir.display()))?,
        None => Assumptions::default_uk(),
    };

    let start_year = args.start_year.unwrap_or_else(|| chrono::Local::now().year());
    let loan = args
        .loan
        .unwrap_or_else(|| assumptions.tuition.typical_loan_amount(start_year));
    let profile = salary_profile(&args)?;

    let earliest = assumptions.rates.earliest_year();
    if start_year < earliest {
        warn!("No interest rates before {}; earlier years use the {} rates", earliest, earliest);
    }

    let inputs = LoanInputs::new(loan, profile, start_year, args.plan, args.course_years)
        .context("invalid loan inputs")?;
    info!(
        "Projecting £{:.0} on {} from {} over a {}-year course",
        loan, args.plan, start_year, args.course_years
    );

    let runner = ScenarioRunner::with_assumptions(assumptions);
    let result = runner.run(&inputs);

    if let Some(path) = &args.output {
        write_ledger(path, &result).with_context(|| format!("writing {}", path.display()))?;
        info!("Ledger written to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_table(&result);
        print_summary(&result, &runner);
    }

    if args.compare {
        println!("\nCareer comparison (highest total paid first):");
        println!("{:<22} {:>12} {:>10} {:>14} {:>8}", "Career", "Total paid", "Cleared", "Written off", "Verdict");
        for outcome in runner.compare_careers(&inputs, CAREER_TEMPLATES) {
            println!(
                "{:<22} {:>12.0} {:>10} {:>14.0} {:>8}",
                outcome.name,
                outcome.total_paid,
                outcome.cleared_age.map_or("-".to_string(), |a| a.to_string()),
                outcome.amount_written_off,
                if outcome.is_good_deal { "good" } else { "bad" },
            );
        }
    }

    Ok(())
}

fn salary_profile(args: &Args) -> Result<SalaryProfile> {
    if let Some(path) = &args.milestones {
        return load_milestones(path).with_context(|| format!("loading milestones from {}", path.display()));
    }
    if !args.milestone.is_empty() {
        return Ok(SalaryProfile::new(args.milestone.clone())?);
    }
    match career::find(&args.career) {
        Some(c) => Ok(c.profile()),
        None => bail!("unknown career {:?}; run with --list-careers", args.career),
    }
}

fn write_ledger(path: &Path, result: &ProjectionResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for year in &result.years {
        writer.serialize(year)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_table(result: &ProjectionResult) {
    println!(
        "{:>4} {:>5} {:>9} {:>7} {:>9} {:>9} {:>8} {:>10} {:>10}",
        "Age", "Year", "Salary", "Rate", "Interest", "Repaid", "Monthly", "Total", "Debt"
    );
    println!("{}", "-".repeat(80));

    for y in &result.years {
        let marker = if y.is_studying {
            " (studying)"
        } else if y.cleared {
            " (cleared)"
        } else {
            ""
        };
        println!(
            "{:>4} {:>5} {:>9.0} {:>6.2}% {:>9.0} {:>9.0} {:>8.0} {:>10.0} {:>10.0}{}",
            y.age,
            y.calendar_year,
            y.salary,
            y.interest_rate * 100.0,
            y.interest_added,
            y.repayment,
            y.monthly_repayment(),
            y.total_paid,
            y.debt_remaining,
            marker,
        );
    }
}

fn print_summary(result: &ProjectionResult, runner: &ScenarioRunner) {
    let summary = &result.summary;
    let stats = result.key_stats();
    let plan = runner.assumptions().plan(result.plan);

    println!("\nSummary ({}, threshold £{:.0}, {:.0}% above threshold):", result.plan, plan.threshold, plan.repayment_rate * 100.0);
    println!("  Borrowed:            £{:.0}", result.initial_debt);
    println!("  Total paid:          £{:.0} over {} years", summary.total_paid, summary.comparison_years);
    println!("  Total interest:      £{:.0}", summary.total_interest);
    match summary.cleared_age {
        Some(age) => println!("  Cleared at age:      {}", age),
        None => println!("  Written off:         £{:.0}", summary.amount_written_off),
    }
    println!("  Years paying:        {}", stats.years_with_payments);
    println!("  Avg monthly:         £{:.0}", stats.avg_monthly_payment);
    println!("  Peak monthly:        £{:.0}", stats.peak_monthly_payment);
    println!("  Peak debt:           £{:.0} at age {}", stats.peak_debt, stats.peak_debt_age);
    println!("  Paid per £1:         £{:.2}", stats.cost_per_pound);
    println!(
        "  {:.0}% personal loan:    £{:.0} over {} years",
        runner.engine().config().personal_loan_rate * 100.0,
        summary.personal_loan_total,
        summary.comparison_years
    );

    if summary.is_good_deal {
        println!(
            "\nGood deal: saved £{:.0} versus the personal loan",
            summary.personal_loan_total - summary.total_paid
        );
    } else {
        println!(
            "\nBad deal: overpaid £{:.0} versus the personal loan",
            summary.total_paid - summary.personal_loan_total
        );
    }
}

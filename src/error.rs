//! Error types for table loading and input validation

use thiserror::Error;

/// Errors raised before a projection runs
///
/// The projection itself never fails; everything here is caught while
/// building assumptions or validating caller inputs.
#[derive(Debug, Error)]
pub enum LoanError {
    #[error("unknown loan plan: {0:?} (expected plan1, plan2, plan4 or plan5)")]
    UnknownPlan(String),

    #[error("invalid plan parameter table: {0}")]
    InvalidPlanTable(String),

    #[error("historical interest rate table is empty")]
    EmptyRateTable,

    #[error("invalid interest rates for {year}: base {base}, max {max}")]
    InvalidRates { year: i32, base: f64, max: f64 },

    #[error("salary profile needs at least one milestone")]
    EmptyMilestones,

    #[error("salary profile has {0} milestones, at most 7 are supported")]
    TooManyMilestones(usize),

    #[error("milestone age {0} is outside 18..=65")]
    MilestoneAgeOutOfRange(u32),

    #[error("milestone salary must be a non-negative amount, got {0}")]
    NegativeSalary(f64),

    #[error("loan amount must be a non-negative amount, got {0}")]
    InvalidLoanAmount(f64),

    #[error("course duration must be between 1 and 7 years, got {0}")]
    InvalidCourseDuration(u32),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("failed to parse {field}: {value:?}")]
    Parse { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, LoanError>;

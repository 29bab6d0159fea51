//! Projection engine for year-by-year student loan repayment

mod state;
mod engine;
mod ledger;
mod comparison;

pub use state::ProjectionState;
pub use engine::{LoanInputs, ProjectionConfig, ProjectionEngine, MAX_COURSE_DURATION};
pub use ledger::{KeyStats, LoanSummary, ProjectionResult, YearResult};
pub use comparison::{monthly_payment, personal_loan_total, DEFAULT_PERSONAL_LOAN_RATE};

//! Student Loan System - year-by-year projections of UK student loan repayment
//!
//! This library provides:
//! - Plan parameters, historical interest rates and tuition fee tables
//! - Career salary profiles with preset trajectories
//! - A deterministic projection of study and repayment years to clearance or write-off
//! - Comparison against an equivalent fixed-rate personal loan
//! - Batch runs across careers

pub mod error;
pub mod assumptions;
pub mod career;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::LoanError;
pub use assumptions::{Assumptions, HistoricalRates, PlanParameters, PlanTable, PlanType};
pub use career::{CareerTemplate, SalaryMilestone, SalaryProfile};
pub use projection::{LoanInputs, LoanSummary, ProjectionEngine, ProjectionResult, YearResult};
pub use scenario::{CareerOutcome, ScenarioRunner};

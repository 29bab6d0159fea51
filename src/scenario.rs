//! Scenario runner for repeated projections
//!
//! Pre-loads assumptions once, then runs many projections against them
//! without re-reading CSV files.

use rayon::prelude::*;
use serde::Serialize;

use crate::assumptions::Assumptions;
use crate::career::CareerTemplate;
use crate::error::Result;
use crate::projection::{LoanInputs, ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Headline outcome of one career under the same loan
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerOutcome {
    pub id: String,
    pub name: String,
    pub total_paid: f64,
    pub cleared_age: Option<u32>,
    pub amount_written_off: f64,
    pub is_good_deal: bool,
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// for career in CAREER_TEMPLATES {
///     let result = runner.run(&inputs.with_profile(career.profile()));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the embedded UK assumptions
    pub fn new() -> Self {
        Self::with_assumptions(Assumptions::default_uk())
    }

    /// Create runner by loading assumptions from CSV files
    pub fn from_csv() -> Result<Self> {
        Ok(Self::with_assumptions(Assumptions::from_csv()?))
    }

    /// Create runner from specific assumptions directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self> {
        Ok(Self::with_assumptions(Assumptions::from_csv_path(path)?))
    }

    /// Create runner with pre-built assumptions
    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self::with_config(assumptions, ProjectionConfig::default())
    }

    pub fn with_config(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(assumptions, config),
        }
    }

    /// Run a single projection
    pub fn run(&self, inputs: &LoanInputs) -> ProjectionResult {
        self.engine.project(inputs)
    }

    /// Run projections for several borrowers
    pub fn run_batch(&self, inputs: &[LoanInputs]) -> Vec<ProjectionResult> {
        inputs.par_iter().map(|i| self.engine.project(i)).collect()
    }

    /// Project the same loan for every career, most expensive first
    ///
    /// `inputs` supplies loan amount, plan, start year and course length; its
    /// salary profile is replaced by each career's.
    pub fn compare_careers(&self, inputs: &LoanInputs, careers: &[CareerTemplate]) -> Vec<CareerOutcome> {
        let mut outcomes: Vec<CareerOutcome> = careers
            .par_iter()
            .map(|career| {
                let result = self.engine.project(&inputs.with_profile(career.profile()));
                CareerOutcome {
                    id: career.id.to_string(),
                    name: career.name.to_string(),
                    total_paid: result.summary.total_paid,
                    cleared_age: result.summary.cleared_age,
                    amount_written_off: result.summary.amount_written_off,
                    is_good_deal: result.summary.is_good_deal,
                }
            })
            .collect();

        outcomes.sort_by(|a, b| b.total_paid.total_cmp(&a.total_paid));
        outcomes
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    /// Get reference to the assumptions in use
    pub fn assumptions(&self) -> &Assumptions {
        self.engine.assumptions()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::PlanType;
    use crate::career::{self, SalaryProfile, CAREER_TEMPLATES};

    fn test_inputs() -> LoanInputs {
        LoanInputs::new(
            50_000.0,
            SalaryProfile::constant(30_000.0).unwrap(),
            2020,
            PlanType::Plan2,
            3,
        )
        .unwrap()
    }

    #[test]
    fn test_compare_careers_sorted_by_total_paid() {
        let runner = ScenarioRunner::new();
        let outcomes = runner.compare_careers(&test_inputs(), CAREER_TEMPLATES);

        assert_eq!(outcomes.len(), CAREER_TEMPLATES.len());
        assert!(outcomes.windows(2).all(|w| w[0].total_paid >= w[1].total_paid));
    }

    #[test]
    fn test_compare_matches_single_runs() {
        let runner = ScenarioRunner::new();
        let inputs = test_inputs();
        let consultant = career::find("medicine-consultant").unwrap();

        let outcomes = runner.compare_careers(&inputs, std::slice::from_ref(consultant));
        let direct = runner.run(&inputs.with_profile(consultant.profile()));

        assert_eq!(outcomes[0].total_paid, direct.summary.total_paid);
        assert_eq!(outcomes[0].cleared_age, direct.summary.cleared_age);
    }

    #[test]
    fn test_batch_preserves_order() {
        let runner = ScenarioRunner::new();
        let base = test_inputs();
        let batch: Vec<_> = [20_000.0, 35_000.0, 90_000.0]
            .iter()
            .map(|&s| base.with_profile(SalaryProfile::constant(s).unwrap()))
            .collect();

        let results = runner.run_batch(&batch);
        assert_eq!(results.len(), 3);

        // Below threshold nothing is repaid; higher earners pay more each year
        assert_eq!(results[0].summary.total_paid, 0.0);
        let first_payment = |r: &ProjectionResult| r.repayment_phase().next().unwrap().repayment;
        assert!(first_payment(&results[2]) > first_payment(&results[1]));
    }
}

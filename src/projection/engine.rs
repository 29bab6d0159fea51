//! Core projection engine: annual study and repayment phases

use log::debug;

use super::comparison::{personal_loan_total, DEFAULT_PERSONAL_LOAN_RATE};
use super::ledger::{LoanSummary, ProjectionResult, YearResult};
use super::state::ProjectionState;
use crate::assumptions::{Assumptions, PlanParameters, PlanType};
use crate::career::SalaryProfile;
use crate::error::{LoanError, Result};

pub const MAX_COURSE_DURATION: u32 = 7;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Age in the first study year
    pub uni_start_age: u32,

    /// Age in the first repayment year, whatever the course length
    pub graduation_age: u32,

    /// Annual rate of the comparison personal loan
    pub personal_loan_rate: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            uni_start_age: 18,
            graduation_age: 22,
            personal_loan_rate: DEFAULT_PERSONAL_LOAN_RATE,
        }
    }
}

/// Validated borrower inputs for one projection
#[derive(Debug, Clone, PartialEq)]
pub struct LoanInputs {
    initial_debt: f64,
    profile: SalaryProfile,
    start_year: i32,
    plan: PlanType,
    course_duration: u32,
}

impl LoanInputs {
    /// Checks the loan amount is a non-negative number and the course lasts 1 to 7 years
    pub fn new(
        initial_debt: f64,
        profile: SalaryProfile,
        start_year: i32,
        plan: PlanType,
        course_duration: u32,
    ) -> Result<Self> {
        if !initial_debt.is_finite() || initial_debt < 0.0 {
            return Err(LoanError::InvalidLoanAmount(initial_debt));
        }
        if !(1..=MAX_COURSE_DURATION).contains(&course_duration) {
            return Err(LoanError::InvalidCourseDuration(course_duration));
        }
        Ok(Self {
            initial_debt,
            profile,
            start_year,
            plan,
            course_duration,
        })
    }

    pub fn initial_debt(&self) -> f64 {
        self.initial_debt
    }

    pub fn profile(&self) -> &SalaryProfile {
        &self.profile
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn plan(&self) -> PlanType {
        self.plan
    }

    pub fn course_duration(&self) -> u32 {
        self.course_duration
    }

    /// Same borrower with a different salary trajectory
    pub fn with_profile(&self, profile: SalaryProfile) -> Self {
        Self {
            profile,
            ..self.clone()
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run a projection over the study years and the full write-off horizon
    ///
    /// Always returns `course_duration + write_off_years + 1` records; years
    /// after clearance are kept with zero activity.
    pub fn project(&self, inputs: &LoanInputs) -> ProjectionResult {
        let plan = self.assumptions.plan(inputs.plan);
        let mut state = ProjectionState::new();
        let mut years = Vec::with_capacity((inputs.course_duration + plan.write_off_years + 1) as usize);

        let annual_disbursement = inputs.initial_debt / inputs.course_duration as f64;
        for year in 0..inputs.course_duration {
            years.push(self.study_year(inputs, &mut state, year, annual_disbursement));
        }

        let graduation_age = self.config.graduation_age;
        for year in 0..=plan.write_off_years {
            years.push(self.repayment_year(inputs, plan, &mut state, graduation_age, year));
        }

        let summary = self.summarize(inputs, plan, &state, graduation_age);
        debug!(
            "{} projection: £{:.0} borrowed, £{:.0} repaid, cleared at {:?}, £{:.0} written off",
            inputs.plan, inputs.initial_debt, summary.total_paid, summary.cleared_age, summary.amount_written_off
        );

        ProjectionResult {
            plan: inputs.plan,
            initial_debt: inputs.initial_debt,
            years,
            summary,
        }
    }

    /// Disburse this year's share and capitalize interest at the year's maximum rate
    fn study_year(&self, inputs: &LoanInputs, state: &mut ProjectionState, year: u32, disbursement: f64) -> YearResult {
        let age = self.config.uni_start_age + year;
        let calendar_year = inputs.start_year + year as i32;

        state.disburse(disbursement);

        // Students pay the upper rate whatever the plan
        let interest_rate = self.assumptions.rates.max_rate(calendar_year);
        let interest_added = state.accrue_interest(interest_rate);

        YearResult {
            age,
            calendar_year,
            salary: 0.0,
            interest_rate,
            interest_added: interest_added.round(),
            repayment: 0.0,
            total_paid: 0.0,
            debt_remaining: state.debt_balance.round(),
            cleared: false,
            is_studying: true,
        }
    }

    /// Interest on the opening balance, then repayment out of salary above the threshold
    fn repayment_year(
        &self,
        inputs: &LoanInputs,
        plan: &PlanParameters,
        state: &mut ProjectionState,
        graduation_age: u32,
        year: u32,
    ) -> YearResult {
        let age = graduation_age + year;
        let calendar_year = inputs.start_year + (inputs.course_duration + year) as i32;
        let salary = inputs.profile.salary_at(age);

        let interest_rate = plan.interest_rate(salary, self.assumptions.rates.rates_for_year(calendar_year));
        let interest_added = state.accrue_interest(interest_rate);
        let repayment = state.repay(plan.annual_repayment(salary));
        let cleared = state.mark_cleared(age);

        YearResult {
            age,
            calendar_year,
            salary: salary.round(),
            interest_rate,
            interest_added: interest_added.round(),
            repayment: repayment.round(),
            total_paid: state.total_paid.round(),
            debt_remaining: state.debt_balance.round().max(0.0),
            cleared,
            is_studying: false,
        }
    }

    fn summarize(
        &self,
        inputs: &LoanInputs,
        plan: &PlanParameters,
        state: &ProjectionState,
        graduation_age: u32,
    ) -> LoanSummary {
        let amount_written_off = match state.cleared_age {
            Some(_) => 0.0,
            None => state.debt_balance.round().max(0.0),
        };

        // Compare over the years actually spent repaying
        let comparison_years = match state.cleared_age {
            Some(age) => age.saturating_sub(graduation_age),
            None => plan.write_off_years,
        };
        let personal_loan = personal_loan_total(inputs.initial_debt, self.config.personal_loan_rate, comparison_years);

        LoanSummary {
            total_paid: state.total_paid.round(),
            cleared_age: state.cleared_age,
            amount_written_off,
            total_interest: state.total_interest.round(),
            is_good_deal: state.total_paid <= personal_loan,
            personal_loan_total: personal_loan.round(),
            comparison_years,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{HistoricalRates, PlanTable};
    use crate::career::SalaryMilestone;
    use approx::assert_relative_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    fn single(age: u32, salary: f64) -> SalaryProfile {
        SalaryProfile::new(vec![SalaryMilestone::new(age, salary)]).unwrap()
    }

    fn uk_engine() -> ProjectionEngine {
        ProjectionEngine::new(Assumptions::default_uk(), ProjectionConfig::default())
    }

    /// UK tables with Plan 5 swapped for a cheap flat-rate plan
    fn flat_engine() -> ProjectionEngine {
        let plans = PlanTable::uk_2024()
            .with_plan(PlanType::Plan5, PlanParameters::flat(20_000.0, 0.09, 0.015, 30))
            .unwrap();
        let assumptions = Assumptions {
            plans,
            ..Assumptions::default_uk()
        };
        ProjectionEngine::new(assumptions, ProjectionConfig::default())
    }

    #[test]
    fn test_first_study_year() {
        let engine = uk_engine();
        let inputs = LoanInputs::new(40_000.0, single(22, 30_000.0), 2024, PlanType::Plan2, 4).unwrap();
        let result = engine.project(&inputs);

        let first = &result.years[0];
        assert_eq!(first.age, 18);
        assert_eq!(first.calendar_year, 2024);
        assert_eq!(first.interest_rate, 0.073);
        assert_eq!(first.interest_added, 730.0);
        assert_eq!(first.debt_remaining, 10_730.0);
        assert!(first.is_studying);
        assert_eq!(first.salary, 0.0);
        assert_eq!(first.total_paid, 0.0);
    }

    #[test]
    fn test_sliding_scale_rate_in_repayment() {
        let engine = uk_engine();
        let inputs = LoanInputs::new(40_000.0, single(22, 30_000.0), 2016, PlanType::Plan2, 4).unwrap();
        let result = engine.project(&inputs);

        // First repayment year is 2020: base 2.6%, max 5.6%
        let first = result.repayment_phase().next().unwrap();
        assert_eq!(first.age, 22);
        assert_eq!(first.calendar_year, 2020);
        let expected = 0.026 + 0.03 * (30_000.0 - 27_295.0) / (49_130.0 - 27_295.0);
        assert_relative_eq!(first.interest_rate, expected, epsilon = 1e-12);
        assert_eq!(first.repayment, (2_705.0_f64 * 0.09).round());
    }

    #[test]
    fn test_single_year_course_single_milestone() {
        let engine = uk_engine();
        let inputs = LoanInputs::new(9_000.0, single(22, 35_000.0), 2024, PlanType::Plan2, 1).unwrap();
        let result = engine.project(&inputs);

        assert_eq!(result.studying_years().count(), 1);
        assert_eq!(result.repayment_phase().count(), 31);
        assert_eq!(result.years.len(), 32);
    }

    #[test]
    fn test_zero_income_is_written_off() {
        let engine = uk_engine();
        for plan in PlanType::ALL {
            let inputs = LoanInputs::new(40_000.0, single(22, 0.0), 2020, plan, 3).unwrap();
            let result = engine.project(&inputs);
            let write_off_years = engine.assumptions().plan(plan).write_off_years;

            assert!(result.repayment_phase().all(|y| y.repayment == 0.0 && !y.cleared));
            assert_eq!(result.summary.total_paid, 0.0);
            assert_eq!(result.summary.cleared_age, None);
            assert_eq!(result.summary.comparison_years, write_off_years);
            assert!(result.summary.amount_written_off > 40_000.0);
            assert_eq!(result.summary.amount_written_off, result.years.last().unwrap().debt_remaining);
            assert!(result.summary.is_good_deal);
        }
    }

    #[test]
    fn test_high_earner_clears_early() {
        let engine = flat_engine();
        let inputs = LoanInputs::new(10_000.0, single(22, 100_000.0), 2020, PlanType::Plan5, 3).unwrap();
        let result = engine.project(&inputs);

        assert_eq!(result.summary.cleared_age, Some(23));
        assert_eq!(result.summary.amount_written_off, 0.0);
        assert_eq!(result.summary.comparison_years, 1);
        assert_eq!(result.years.len(), 3 + 31);

        let cleared: Vec<_> = result.years.iter().filter(|y| y.cleared).collect();
        assert_eq!(cleared.len(), 1);
        assert_eq!(cleared[0].age, 23);

        // Flat plans charge their own rate after graduation
        assert!(result.repayment_phase().all(|y| y.interest_rate == 0.015));

        for later in result.repayment_phase().filter(|y| y.age > 23) {
            assert_eq!(later.debt_remaining, 0.0);
            assert_eq!(later.repayment, 0.0);
            assert_eq!(later.interest_added, 0.0);
            assert_eq!(later.total_paid, result.summary.total_paid);
        }
    }

    #[test]
    fn test_exact_threshold_salary_repays_nothing() {
        let engine = uk_engine();
        let threshold = engine.assumptions().plan(PlanType::Plan2).threshold;
        let inputs = LoanInputs::new(30_000.0, single(22, threshold), 2015, PlanType::Plan2, 3).unwrap();
        let result = engine.project(&inputs);

        assert!(result.repayment_phase().all(|y| y.repayment == 0.0));
        // At the threshold Plan 2 charges the base rate
        let first = result.repayment_phase().next().unwrap();
        assert_eq!(first.interest_rate, engine.assumptions().rates.base_rate(first.calendar_year));
    }

    #[test]
    fn test_zero_debt_clears_immediately() {
        let engine = uk_engine();
        let inputs = LoanInputs::new(0.0, single(22, 0.0), 2024, PlanType::Plan2, 3).unwrap();
        let result = engine.project(&inputs);

        let first = result.repayment_phase().next().unwrap();
        assert!(first.cleared);
        assert_eq!(result.summary.cleared_age, Some(22));
        assert_eq!(result.summary.amount_written_off, 0.0);
        assert_eq!(result.summary.comparison_years, 0);
        assert_eq!(result.summary.personal_loan_total, 0.0);
        assert!(result.summary.is_good_deal);
    }

    #[test]
    fn test_long_course_repays_from_graduation_age() {
        let engine = uk_engine();
        let profile = SalaryProfile::new(vec![
            SalaryMilestone::new(22, 30_000.0),
            SalaryMilestone::new(24, 90_000.0),
        ])
        .unwrap();
        let inputs = LoanInputs::new(60_000.0, profile, 2013, PlanType::Plan2, 6).unwrap();
        let result = engine.project(&inputs);

        let ages: Vec<u32> = result.years.iter().map(|y| y.age).collect();
        assert_eq!(&ages[..8], &[18, 19, 20, 21, 22, 23, 22, 23]);

        // Repayment starts the calendar year after study, at age 22 and its salary
        let first = result.repayment_phase().next().unwrap();
        assert_eq!(first.age, 22);
        assert_eq!(first.calendar_year, 2019);
        assert_eq!(first.salary, 30_000.0);
        assert_eq!(result.years.last().unwrap().age, 52);

        if let Some(age) = result.summary.cleared_age {
            assert_eq!(result.summary.comparison_years, age - 22);
        }
    }

    #[test]
    fn test_calendar_years_are_contiguous() {
        let engine = uk_engine();
        let inputs = LoanInputs::new(27_000.0, single(22, 32_000.0), 2013, PlanType::Plan1, 3).unwrap();
        let result = engine.project(&inputs);

        let years: Vec<i32> = result.years.iter().map(|y| y.calendar_year).collect();
        assert_eq!(years[0], 2013);
        assert!(years.windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn test_personal_loan_uses_configured_rate() {
        let cheap = ProjectionEngine::new(
            Assumptions::default_uk(),
            ProjectionConfig {
                personal_loan_rate: 0.0,
                ..ProjectionConfig::default()
            },
        );
        let inputs = LoanInputs::new(30_000.0, single(22, 0.0), 2020, PlanType::Plan2, 3).unwrap();
        assert_eq!(cheap.project(&inputs).summary.personal_loan_total, 30_000.0);
    }

    #[test]
    fn test_synthetic_rate_table_is_used() {
        let assumptions = Assumptions {
            rates: HistoricalRates::new(vec![(2000, 0.0, 0.0)]).unwrap(),
            ..Assumptions::default_uk()
        };
        let engine = ProjectionEngine::new(assumptions, ProjectionConfig::default());
        let inputs = LoanInputs::new(30_000.0, single(22, 0.0), 2020, PlanType::Plan2, 3).unwrap();
        let result = engine.project(&inputs);

        assert_eq!(result.summary.total_interest, 0.0);
        assert_eq!(result.summary.amount_written_off, 30_000.0);
    }

    #[test]
    fn test_input_validation() {
        let profile = single(22, 30_000.0);
        assert!(matches!(
            LoanInputs::new(-1.0, profile.clone(), 2020, PlanType::Plan2, 3),
            Err(LoanError::InvalidLoanAmount(_))
        ));
        assert!(matches!(
            LoanInputs::new(f64::NAN, profile.clone(), 2020, PlanType::Plan2, 3),
            Err(LoanError::InvalidLoanAmount(_))
        ));
        assert!(matches!(
            LoanInputs::new(1_000.0, profile.clone(), 2020, PlanType::Plan2, 0),
            Err(LoanError::InvalidCourseDuration(0))
        ));
        assert!(LoanInputs::new(1_000.0, profile, 2020, PlanType::Plan2, 8).is_err());
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_ledger_invariants(
            debt in 0u32..120_000,
            first_salary in 0u32..150_000,
            raise in 0u32..60_000,
            raise_age in 23u32..50,
            start_year in 1998i32..2035,
            course in 1u32..=MAX_COURSE_DURATION,
            plan_idx in 0usize..4
        ) {
            let plan = PlanType::ALL[plan_idx];
            let profile = SalaryProfile::new(vec![
                SalaryMilestone::new(22, first_salary as f64),
                SalaryMilestone::new(raise_age, (first_salary + raise) as f64),
            ]).unwrap();
            let inputs = LoanInputs::new(debt as f64, profile, start_year, plan, course).unwrap();
            let engine = uk_engine();
            let params = engine.assumptions().plan(plan).clone();
            let result = engine.project(&inputs);

            prop_assert_eq!(result.years.len() as u32, course + params.write_off_years + 1);
            prop_assert_eq!(result.studying_years().count() as u32, course);

            // Deterministic
            prop_assert_eq!(&engine.project(&inputs), &result);

            let study_ages: Vec<u32> = result.studying_years().map(|y| y.age).collect();
            let repay_ages: Vec<u32> = result.repayment_phase().map(|y| y.age).collect();
            prop_assert!(study_ages.windows(2).all(|w| w[1] == w[0] + 1));
            prop_assert!(repay_ages.windows(2).all(|w| w[1] == w[0] + 1));
            prop_assert_eq!(repay_ages[0], 22);
            prop_assert!(result.years.windows(2).all(|w| w[1].calendar_year == w[0].calendar_year + 1));
            prop_assert!(result.years.iter().all(|y| y.debt_remaining >= 0.0));
            prop_assert!(result.years.windows(2).all(|w| w[1].total_paid >= w[0].total_paid));
            prop_assert!(result.years.iter().filter(|y| y.cleared).count() <= 1);

            for y in result.repayment_phase() {
                if y.salary <= params.threshold {
                    prop_assert_eq!(y.repayment, 0.0);
                }
            }

            // Never pays more than the balance after interest (allowing for whole-pound rounding)
            for w in result.years.windows(2) {
                prop_assert!(w[1].repayment <= w[0].debt_remaining + w[1].interest_added + 2.0);
            }

            match result.summary.cleared_age {
                Some(age) => {
                    let idx = result.years.iter().position(|y| y.cleared).unwrap();
                    prop_assert_eq!(result.years[idx].age, age);
                    prop_assert_eq!(result.summary.amount_written_off, 0.0);
                    for later in &result.years[idx + 1..] {
                        prop_assert_eq!(later.debt_remaining, 0.0);
                        prop_assert_eq!(later.repayment, 0.0);
                    }
                }
                None => {
                    prop_assert!(result.years.iter().all(|y| !y.cleared));
                    prop_assert_eq!(result.summary.comparison_years, params.write_off_years);
                    prop_assert_eq!(
                        result.summary.amount_written_off,
                        result.years.last().unwrap().debt_remaining
                    );
                }
            }

            prop_assert_eq!(result.summary.total_paid, result.years.last().unwrap().total_paid);
        }

        #[test]
        fn prop_sliding_rate_clamps_for_any_year(year in 1950i32..2100, below in 0u32..27_295, above in 49_130u32..500_000) {
            let engine = uk_engine();
            let plan2 = engine.assumptions().plan(PlanType::Plan2);
            let (base, max) = engine.assumptions().rates.rates_for_year(year);

            prop_assert_eq!(plan2.interest_rate(below as f64, (base, max)), base);
            prop_assert_eq!(plan2.interest_rate(above as f64, (base, max)), max);

            let mid = plan2.interest_rate(38_000.0, (base, max));
            prop_assert!(mid >= base && mid <= max);
        }
    }
}

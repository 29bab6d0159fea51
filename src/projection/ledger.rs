//! Projection output: the year-by-year ledger and its summary

use serde::{Deserialize, Serialize};

use crate::assumptions::PlanType;

/// One simulated year; currency amounts are rounded to whole pounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearResult {
    pub age: u32,
    pub calendar_year: i32,

    /// Zero while studying
    pub salary: f64,

    /// Effective annual interest rate applied this year
    pub interest_rate: f64,
    pub interest_added: f64,
    pub repayment: f64,

    /// Cumulative repayments up to and including this year
    pub total_paid: f64,

    /// Balance after this year's interest and repayment, floored at zero
    pub debt_remaining: f64,

    /// Set only on the year the balance first reaches zero
    pub cleared: bool,
    pub is_studying: bool,
}

impl YearResult {
    /// This year's repayment as an average monthly amount
    pub fn monthly_repayment(&self) -> f64 {
        (self.repayment / 12.0).round()
    }
}

/// Terminal outcome of a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanSummary {
    pub total_paid: f64,
    pub cleared_age: Option<u32>,

    /// Balance forgiven at the write-off horizon (zero if cleared)
    pub amount_written_off: f64,
    pub total_interest: f64,

    /// Total paid was no more than the personal loan equivalent
    pub is_good_deal: bool,
    pub personal_loan_total: f64,

    /// Years the personal loan is amortized over
    pub comparison_years: u32,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub plan: PlanType,
    pub initial_debt: f64,

    /// Study years followed by repayment years
    pub years: Vec<YearResult>,
    pub summary: LoanSummary,
}

impl ProjectionResult {
    pub fn studying_years(&self) -> impl Iterator<Item = &YearResult> {
        self.years.iter().filter(|y| y.is_studying)
    }

    pub fn repayment_phase(&self) -> impl Iterator<Item = &YearResult> {
        self.years.iter().filter(|y| !y.is_studying)
    }

    /// The record on which the balance cleared, if it did
    pub fn cleared_year(&self) -> Option<&YearResult> {
        self.years.iter().find(|y| y.cleared)
    }

    /// Years spent repaying: until clearance, otherwise the whole write-off period
    pub fn repayment_years(&self) -> u32 {
        self.summary.comparison_years
    }

    /// Headline statistics for display
    pub fn key_stats(&self) -> KeyStats {
        let years_with_payments = self.years.iter().filter(|y| y.repayment > 0.0).count() as u32;
        let avg_monthly_payment = if years_with_payments > 0 {
            (self.summary.total_paid / years_with_payments as f64 / 12.0).round()
        } else {
            0.0
        };
        let peak_monthly_payment = (self.years.iter().map(|y| y.repayment).fold(0.0, f64::max) / 12.0).round();

        let peak_debt = self.years.iter().map(|y| y.debt_remaining).fold(0.0, f64::max);
        let peak_debt_age = self
            .years
            .iter()
            .find(|y| y.debt_remaining == peak_debt)
            .map(|y| y.age)
            .unwrap_or(0);

        let peak_salary = self.years.iter().map(|y| y.salary).fold(0.0, f64::max);
        let peak_payment = self
            .years
            .iter()
            .find(|y| y.salary == peak_salary)
            .map(|y| y.repayment)
            .unwrap_or(0.0);
        let effective_rate_at_peak = if peak_salary > 0.0 { peak_payment / peak_salary } else { 0.0 };

        let cost_per_pound = if self.initial_debt > 0.0 {
            self.summary.total_paid / self.initial_debt
        } else {
            0.0
        };

        KeyStats {
            years_with_payments,
            avg_monthly_payment,
            peak_monthly_payment,
            peak_debt,
            peak_debt_age,
            peak_salary,
            effective_rate_at_peak,
            cost_per_pound,
        }
    }
}

/// Derived display statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStats {
    pub years_with_payments: u32,
    pub avg_monthly_payment: f64,
    pub peak_monthly_payment: f64,
    pub peak_debt: f64,
    pub peak_debt_age: u32,
    pub peak_salary: f64,

    /// Repayment as a share of salary in the best-paid year
    pub effective_rate_at_peak: f64,

    /// Total repaid per pound borrowed
    pub cost_per_pound: f64,
}

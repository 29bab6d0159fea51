//! Repayment plan parameters: thresholds, repayment rate, interest policy and write-off horizon

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LoanError, Result};

/// Gap between the lower and upper threshold when the source data omits the upper one
pub const DEFAULT_UPPER_THRESHOLD_GAP: f64 = 25_000.0;

/// UK student loan repayment plans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    /// Pre-2012 England/Wales, all Northern Ireland
    Plan1,
    /// England/Wales 2012-2023
    Plan2,
    /// Scotland
    Plan4,
    /// England 2023 onwards
    Plan5,
}

impl PlanType {
    pub const ALL: [PlanType; 4] = [PlanType::Plan1, PlanType::Plan2, PlanType::Plan4, PlanType::Plan5];

    /// Identifier used in CSV files and requests
    pub fn id(&self) -> &'static str {
        match self {
            PlanType::Plan1 => "plan1",
            PlanType::Plan2 => "plan2",
            PlanType::Plan4 => "plan4",
            PlanType::Plan5 => "plan5",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlanType::Plan1 => "Plan 1",
            PlanType::Plan2 => "Plan 2",
            PlanType::Plan4 => "Plan 4",
            PlanType::Plan5 => "Plan 5",
        }
    }

    /// Who typically holds this plan
    pub fn cohort(&self) -> &'static str {
        match self {
            PlanType::Plan1 => "Pre-2012",
            PlanType::Plan2 => "2012-2023",
            PlanType::Plan4 => "Scotland",
            PlanType::Plan5 => "2023+",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PlanType {
    type Err = LoanError;

    /// Accepts "plan2", "Plan 2", "plan_2" or just "2"
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect();
        let digits = normalized.strip_prefix("plan").unwrap_or(&normalized);

        match digits {
            "1" => Ok(PlanType::Plan1),
            "2" => Ok(PlanType::Plan2),
            "4" => Ok(PlanType::Plan4),
            "5" => Ok(PlanType::Plan5),
            _ => Err(LoanError::UnknownPlan(s.to_string())),
        }
    }
}

/// Regulatory parameters for one plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanParameters {
    /// Annual income below which nothing is repaid
    pub threshold: f64,

    /// Income at which sliding-scale interest reaches its maximum
    pub upper_threshold: f64,

    /// Fraction of income above the threshold that is repaid
    pub repayment_rate: f64,

    /// Lowest interest rate (equal to `max_interest` for flat-rate plans)
    pub base_interest: f64,

    /// Highest interest rate
    pub max_interest: f64,

    /// Repayment years after which the remaining balance is written off
    pub write_off_years: u32,

    /// Interest varies with income between the two thresholds
    pub has_sliding_scale: bool,
}

impl PlanParameters {
    /// Plan charging the same interest rate at every income
    pub fn flat(threshold: f64, repayment_rate: f64, interest_rate: f64, write_off_years: u32) -> Self {
        Self {
            threshold,
            upper_threshold: threshold + DEFAULT_UPPER_THRESHOLD_GAP,
            repayment_rate,
            base_interest: interest_rate,
            max_interest: interest_rate,
            write_off_years,
            has_sliding_scale: false,
        }
    }

    /// Plan whose interest rises linearly with income between the thresholds
    pub fn sliding(
        threshold: f64,
        upper_threshold: Option<f64>,
        repayment_rate: f64,
        base_interest: f64,
        max_interest: f64,
        write_off_years: u32,
    ) -> Self {
        Self {
            threshold,
            upper_threshold: upper_threshold.unwrap_or(threshold + DEFAULT_UPPER_THRESHOLD_GAP),
            repayment_rate,
            base_interest,
            max_interest,
            write_off_years,
            has_sliding_scale: true,
        }
    }

    /// Check the table invariants for this plan
    pub fn validate(&self, plan: PlanType) -> Result<()> {
        let fail = |msg: String| Err(LoanError::InvalidPlanTable(format!("{}: {}", plan.id(), msg)));

        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return fail(format!("threshold {} must be non-negative", self.threshold));
        }
        if !(0.0..=1.0).contains(&self.repayment_rate) {
            return fail(format!("repayment rate {} must be within [0, 1]", self.repayment_rate));
        }
        if !self.base_interest.is_finite() || !self.max_interest.is_finite() || self.base_interest < 0.0 {
            return fail(format!(
                "interest rates {} and {} must be finite and non-negative",
                self.base_interest, self.max_interest
            ));
        }
        if self.base_interest > self.max_interest {
            return fail(format!(
                "base interest {} exceeds max interest {}",
                self.base_interest, self.max_interest
            ));
        }
        if !self.upper_threshold.is_finite() {
            return fail(format!("upper threshold {} must be finite", self.upper_threshold));
        }
        if self.has_sliding_scale && self.threshold >= self.upper_threshold {
            return fail(format!(
                "upper threshold {} must exceed threshold {}",
                self.upper_threshold, self.threshold
            ));
        }
        if self.write_off_years == 0 {
            return fail("write-off years must be positive".to_string());
        }
        Ok(())
    }

    /// Annual repayment due on a salary: a share of income strictly above the threshold
    pub fn annual_repayment(&self, salary: f64) -> f64 {
        if salary <= self.threshold {
            return 0.0;
        }
        (salary - self.threshold) * self.repayment_rate
    }

    /// Interest rate for a salary given the (base, max) rates in force that year
    ///
    /// Flat-rate plans ignore both arguments and return their fixed rate.
    pub fn interest_rate(&self, salary: f64, (base, max): (f64, f64)) -> f64 {
        if !self.has_sliding_scale {
            return self.base_interest;
        }
        if salary <= self.threshold {
            return base;
        }
        if salary >= self.upper_threshold {
            return max;
        }
        let proportion = (salary - self.threshold) / (self.upper_threshold - self.threshold);
        base + (max - base) * proportion
    }

    /// Interest rate for a salary using the plan's own current rates
    pub fn interest_rate_current(&self, salary: f64) -> f64 {
        self.interest_rate(salary, (self.base_interest, self.max_interest))
    }
}

/// Parameters for every plan; lookup is total once the table is built
#[derive(Debug, Clone, PartialEq)]
pub struct PlanTable {
    plan1: PlanParameters,
    plan2: PlanParameters,
    plan4: PlanParameters,
    plan5: PlanParameters,
}

impl PlanTable {
    /// Build a table from one entry per plan
    ///
    /// Rejects missing or duplicate plans, broken invariants, and more than
    /// one sliding-scale plan.
    pub fn from_entries(entries: Vec<(PlanType, PlanParameters)>) -> Result<Self> {
        let mut slots: [Option<PlanParameters>; 4] = [None, None, None, None];

        for (plan, params) in entries {
            params.validate(plan)?;
            let slot = &mut slots[Self::index(plan)];
            if slot.is_some() {
                return Err(LoanError::InvalidPlanTable(format!("duplicate entry for {}", plan.id())));
            }
            *slot = Some(params);
        }

        let [plan1, plan2, plan4, plan5] = slots;
        let take = |slot: Option<PlanParameters>, plan: PlanType| {
            slot.ok_or_else(|| LoanError::InvalidPlanTable(format!("missing entry for {}", plan.id())))
        };

        let table = Self {
            plan1: take(plan1, PlanType::Plan1)?,
            plan2: take(plan2, PlanType::Plan2)?,
            plan4: take(plan4, PlanType::Plan4)?,
            plan5: take(plan5, PlanType::Plan5)?,
        };
        table.check_sliding_count()?;
        Ok(table)
    }

    /// 2024/25 UK parameters
    pub fn uk_2024() -> Self {
        Self {
            plan1: PlanParameters::flat(24_990.0, 0.09, 0.043, 25),
            plan2: PlanParameters::sliding(27_295.0, Some(49_130.0), 0.09, 0.043, 0.073, 30),
            plan4: PlanParameters::flat(31_395.0, 0.09, 0.043, 30),
            plan5: PlanParameters::flat(25_000.0, 0.09, 0.043, 40),
        }
    }

    /// Replace one plan's parameters, revalidating the table
    pub fn with_plan(mut self, plan: PlanType, params: PlanParameters) -> Result<Self> {
        params.validate(plan)?;
        *self.get_mut(plan) = params;
        self.check_sliding_count()?;
        Ok(self)
    }

    pub fn get(&self, plan: PlanType) -> &PlanParameters {
        match plan {
            PlanType::Plan1 => &self.plan1,
            PlanType::Plan2 => &self.plan2,
            PlanType::Plan4 => &self.plan4,
            PlanType::Plan5 => &self.plan5,
        }
    }

    fn get_mut(&mut self, plan: PlanType) -> &mut PlanParameters {
        match plan {
            PlanType::Plan1 => &mut self.plan1,
            PlanType::Plan2 => &mut self.plan2,
            PlanType::Plan4 => &mut self.plan4,
            PlanType::Plan5 => &mut self.plan5,
        }
    }

    /// The plan with income-sensitive interest, if any
    pub fn sliding_scale_plan(&self) -> Option<PlanType> {
        PlanType::ALL.into_iter().find(|&p| self.get(p).has_sliding_scale)
    }

    fn check_sliding_count(&self) -> Result<()> {
        let sliding = PlanType::ALL
            .iter()
            .filter(|&&p| self.get(p).has_sliding_scale)
            .count();
        if sliding > 1 {
            return Err(LoanError::InvalidPlanTable(format!(
                "{} plans have sliding-scale interest, at most one may",
                sliding
            )));
        }
        Ok(())
    }

    fn index(plan: PlanType) -> usize {
        match plan {
            PlanType::Plan1 => 0,
            PlanType::Plan2 => 1,
            PlanType::Plan4 => 2,
            PlanType::Plan5 => 3,
        }
    }
}

impl Default for PlanTable {
    fn default() -> Self {
        Self::uk_2024()
    }
}

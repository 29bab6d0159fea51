//! Salary milestones and the step-function salary lookup used by projections

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LoanError, Result};

pub const MAX_MILESTONES: usize = 7;
pub const MIN_MILESTONE_AGE: u32 = 18;
pub const MAX_MILESTONE_AGE: u32 = 65;

/// Salary from a given age onwards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryMilestone {
    pub age: u32,
    pub salary: f64,
}

impl SalaryMilestone {
    pub fn new(age: u32, salary: f64) -> Self {
        Self { age, salary }
    }
}

impl FromStr for SalaryMilestone {
    type Err = LoanError;

    /// Parses "age:salary", e.g. "26:41000"
    fn from_str(s: &str) -> Result<Self> {
        let (age, salary) = s.split_once(':').ok_or_else(|| LoanError::Parse {
            field: "milestone",
            value: s.to_string(),
        })?;
        let age = age.trim().parse().map_err(|_| LoanError::Parse {
            field: "milestone age",
            value: age.to_string(),
        })?;
        let salary = salary.trim().replace(',', "").parse().map_err(|_| LoanError::Parse {
            field: "milestone salary",
            value: salary.to_string(),
        })?;
        Ok(Self { age, salary })
    }
}

/// A validated career salary trajectory, milestones held in age order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SalaryProfile {
    milestones: Vec<SalaryMilestone>,
}

impl SalaryProfile {
    /// Validate and sort milestones
    ///
    /// Requires 1 to 7 milestones with ages in 18..=65 and non-negative
    /// salaries. Duplicate ages are tolerated; the later entry wins.
    pub fn new(mut milestones: Vec<SalaryMilestone>) -> Result<Self> {
        if milestones.is_empty() {
            return Err(LoanError::EmptyMilestones);
        }
        if milestones.len() > MAX_MILESTONES {
            return Err(LoanError::TooManyMilestones(milestones.len()));
        }
        for m in &milestones {
            if !(MIN_MILESTONE_AGE..=MAX_MILESTONE_AGE).contains(&m.age) {
                return Err(LoanError::MilestoneAgeOutOfRange(m.age));
            }
            if !m.salary.is_finite() || m.salary < 0.0 {
                return Err(LoanError::NegativeSalary(m.salary));
            }
        }

        // Stable, so equal ages keep their input order
        milestones.sort_by_key(|m| m.age);
        Ok(Self { milestones })
    }

    /// One salary for every age
    pub fn constant(salary: f64) -> Result<Self> {
        Self::new(vec![SalaryMilestone::new(MIN_MILESTONE_AGE, salary)])
    }

    /// Salary at an age: the latest milestone at or before it, or the first
    /// milestone's salary for ages before the trajectory starts
    ///
    /// Salary jumps at each milestone rather than rising smoothly between them.
    pub fn salary_at(&self, age: u32) -> f64 {
        let reached = self.milestones.partition_point(|m| m.age <= age);
        match reached {
            0 => self.milestones[0].salary,
            n => self.milestones[n - 1].salary,
        }
    }

    pub fn milestones(&self) -> &[SalaryMilestone] {
        &self.milestones
    }

    pub fn peak_salary(&self) -> f64 {
        self.milestones.iter().map(|m| m.salary).fold(0.0, f64::max)
    }
}

impl<'de> Deserialize<'de> for SalaryProfile {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let milestones = Vec::<SalaryMilestone>::deserialize(deserializer)?;
        SalaryProfile::new(milestones).map_err(serde::de::Error::custom)
    }
}

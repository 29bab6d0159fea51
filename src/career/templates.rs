//! Preset career salary trajectories (approximate UK figures)

use serde::Serialize;

use super::profile::{SalaryMilestone, SalaryProfile};

/// A named career with its salary milestones as (age, salary) pairs
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CareerTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub milestones: &'static [(u32, f64)],
}

impl CareerTemplate {
    /// Salary profile for this career
    ///
    /// Preset data always satisfies the profile rules, so this never fails.
    pub fn profile(&self) -> SalaryProfile {
        let milestones = self
            .milestones
            .iter()
            .map(|&(age, salary)| SalaryMilestone::new(age, salary))
            .collect();
        SalaryProfile::new(milestones).unwrap_or_else(|e| panic!("career preset {} is invalid: {}", self.id, e))
    }
}

pub const CAREER_TEMPLATES: &[CareerTemplate] = &[
    // NHS Agenda for Change bands 5 to 8, 2024/25
    CareerTemplate {
        id: "nursing",
        name: "Nursing",
        milestones: &[(22, 29_000.0), (26, 33_000.0), (31, 38_000.0), (41, 48_000.0), (52, 55_000.0)],
    },
    CareerTemplate {
        id: "software",
        name: "Software Engineer",
        milestones: &[
            (22, 32_000.0),
            (26, 45_000.0),
            (31, 58_000.0),
            (36, 68_000.0),
            (42, 75_000.0),
            (52, 80_000.0),
        ],
    },
    CareerTemplate {
        id: "tech-lead",
        name: "Tech Lead",
        milestones: &[
            (22, 30_000.0),
            (25, 50_000.0),
            (28, 80_000.0),
            (32, 100_000.0),
            (35, 125_000.0),
            (52, 130_000.0),
        ],
    },
    // Teacher pay scales England 2024/25
    CareerTemplate {
        id: "teaching",
        name: "Teaching",
        milestones: &[(22, 31_000.0), (26, 36_000.0), (31, 43_000.0), (41, 50_000.0), (52, 55_000.0)],
    },
    CareerTemplate {
        id: "medicine-gp",
        name: "Medicine (GP)",
        milestones: &[
            (22, 32_000.0),
            (25, 52_000.0),
            (30, 76_000.0),
            (35, 90_000.0),
            (42, 100_000.0),
            (52, 110_000.0),
        ],
    },
    CareerTemplate {
        id: "medicine-consultant",
        name: "Consultant",
        milestones: &[(22, 32_000.0), (25, 52_000.0), (35, 110_000.0), (40, 130_000.0), (52, 145_000.0)],
    },
    CareerTemplate {
        id: "pharmacist",
        name: "Pharmacist",
        milestones: &[
            (22, 33_000.0),
            (26, 40_000.0),
            (31, 48_000.0),
            (36, 55_000.0),
            (42, 62_000.0),
            (52, 68_000.0),
        ],
    },
    CareerTemplate {
        id: "business-analyst",
        name: "Business Analyst",
        milestones: &[
            (22, 28_000.0),
            (26, 40_000.0),
            (31, 50_000.0),
            (36, 58_000.0),
            (42, 63_000.0),
            (52, 65_000.0),
        ],
    },
    CareerTemplate {
        id: "law",
        name: "Law",
        milestones: &[(22, 28_000.0), (26, 45_000.0), (31, 60_000.0), (40, 80_000.0), (52, 95_000.0)],
    },
    CareerTemplate {
        id: "engineering",
        name: "Engineering",
        milestones: &[(22, 30_000.0), (26, 40_000.0), (31, 52_000.0), (40, 62_000.0), (52, 70_000.0)],
    },
    CareerTemplate {
        id: "creative",
        name: "Creative Arts",
        milestones: &[(22, 24_000.0), (26, 30_000.0), (31, 36_000.0), (40, 42_000.0), (52, 48_000.0)],
    },
];

/// Look up a preset by id
pub fn find(id: &str) -> Option<&'static CareerTemplate> {
    CAREER_TEMPLATES.iter().find(|c| c.id == id)
}

//! Loan assumptions: plan parameters, historical interest rates and tuition fees

mod plan;
mod rates;
mod tuition;
pub mod loader;

pub use plan::{PlanParameters, PlanTable, PlanType, DEFAULT_UPPER_THRESHOLD_GAP};
pub use rates::HistoricalRates;
pub use tuition::{TuitionBracket, TuitionFeeTable, TuitionFees, TYPICAL_MAINTENANCE};
pub use loader::LoadedAssumptions;

use std::path::Path;

use crate::error::Result;

/// Container for all projection assumptions
///
/// Read-only once built; the engine receives it by value so tests can inject
/// synthetic tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Assumptions {
    pub plans: PlanTable,
    pub rates: HistoricalRates,
    pub tuition: TuitionFeeTable,
}

impl Assumptions {
    /// Create assumptions with the published UK figures
    pub fn default_uk() -> Self {
        Self {
            plans: PlanTable::uk_2024(),
            rates: HistoricalRates::uk_published(),
            tuition: TuitionFeeTable::england(),
        }
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedAssumptions::load_from(path)?;

        Ok(Self {
            plans: loaded.plans,
            rates: loaded.rates,
            tuition: loaded.tuition,
        })
    }

    pub fn plan(&self, plan: PlanType) -> &PlanParameters {
        self.plans.get(plan)
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self::default_uk()
    }
}

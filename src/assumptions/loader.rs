//! CSV-based assumption loader
//!
//! Loads plan parameters, historical rates and tuition fees from CSV files in data/assumptions/

use std::fs::File;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use super::plan::{PlanParameters, PlanTable, PlanType};
use super::rates::HistoricalRates;
use super::tuition::{TuitionBracket, TuitionFeeTable};
use crate::error::{LoanError, Result};

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

pub const PLAN_PARAMETERS_FILE: &str = "plan_parameters.csv";
pub const HISTORICAL_RATES_FILE: &str = "historical_rates.csv";
pub const TUITION_FEES_FILE: &str = "tuition_fees.csv";

/// Raw row of plan_parameters.csv
///
/// A row gives either a flat `interest_rate` or a `base_rate`/`max_rate`
/// pair; the pair marks the plan as sliding-scale.
#[derive(Debug, Deserialize)]
struct PlanRow {
    plan: String,
    threshold: f64,
    upper_threshold: Option<f64>,
    repayment_rate: f64,
    interest_rate: Option<f64>,
    base_rate: Option<f64>,
    max_rate: Option<f64>,
    write_off_years: u32,
}

impl PlanRow {
    fn into_entry(self) -> Result<(PlanType, PlanParameters)> {
        let plan: PlanType = self.plan.parse()?;

        let params = match (self.interest_rate, self.base_rate, self.max_rate) {
            (Some(rate), None, None) => {
                let mut params = PlanParameters::flat(self.threshold, self.repayment_rate, rate, self.write_off_years);
                if let Some(upper) = self.upper_threshold {
                    params.upper_threshold = upper;
                }
                params
            }
            (None, Some(base), Some(max)) => PlanParameters::sliding(
                self.threshold,
                self.upper_threshold,
                self.repayment_rate,
                base,
                max,
                self.write_off_years,
            ),
            _ => {
                return Err(LoanError::InvalidPlanTable(format!(
                    "{}: give either interest_rate or both base_rate and max_rate",
                    plan.id()
                )))
            }
        };

        Ok((plan, params))
    }
}

#[derive(Debug, Deserialize)]
struct RateRow {
    year: i32,
    base_rate: f64,
    max_rate: f64,
}

fn open(path: &Path, file_name: &str) -> Result<csv::Reader<File>> {
    let full_path = path.join(file_name);
    let file = File::open(&full_path).map_err(|source| LoanError::Io {
        path: full_path.display().to_string(),
        source,
    })?;
    Ok(csv::Reader::from_reader(file))
}

/// Load plan parameters from CSV
pub fn load_plan_parameters(path: &Path) -> Result<PlanTable> {
    let mut reader = open(path, PLAN_PARAMETERS_FILE)?;

    let mut entries = Vec::new();
    for result in reader.deserialize() {
        let row: PlanRow = result?;
        entries.push(row.into_entry()?);
    }

    PlanTable::from_entries(entries)
}

/// Load historical (base, max) interest rates from CSV
pub fn load_historical_rates(path: &Path) -> Result<HistoricalRates> {
    let mut reader = open(path, HISTORICAL_RATES_FILE)?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: RateRow = result?;
        rows.push((row.year, row.base_rate, row.max_rate));
    }

    HistoricalRates::new(rows)
}

/// Load tuition fee brackets from CSV
pub fn load_tuition_fees(path: &Path) -> Result<TuitionFeeTable> {
    let mut reader = open(path, TUITION_FEES_FILE)?;

    let mut brackets = Vec::new();
    for result in reader.deserialize() {
        let bracket: TuitionBracket = result?;
        brackets.push(bracket);
    }

    Ok(TuitionFeeTable::new(brackets))
}

/// All assumption tables loaded from one directory
pub struct LoadedAssumptions {
    pub plans: PlanTable,
    pub rates: HistoricalRates,
    pub tuition: TuitionFeeTable,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let loaded = Self {
            plans: load_plan_parameters(path)?,
            rates: load_historical_rates(path)?,
            tuition: load_tuition_fees(path)?,
        };
        debug!(
            "Loaded assumptions from {}: rates {}-{}, {} tuition brackets",
            path.display(),
            loaded.rates.earliest_year(),
            loaded.rates.latest_year(),
            loaded.tuition.brackets().len()
        );
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_assumptions() {
        let result = LoadedAssumptions::load_default();
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let loaded = result.unwrap();

        // Shipped CSVs mirror the embedded defaults
        assert_eq!(loaded.plans, PlanTable::uk_2024());
        assert_eq!(loaded.rates, HistoricalRates::uk_published());
        assert_eq!(loaded.tuition, TuitionFeeTable::england());
    }

    #[test]
    fn test_flat_row_with_both_rate_forms_rejected() {
        let row = PlanRow {
            plan: "plan1".to_string(),
            threshold: 24_990.0,
            upper_threshold: None,
            repayment_rate: 0.09,
            interest_rate: Some(0.043),
            base_rate: Some(0.043),
            max_rate: None,
            write_off_years: 25,
        };
        assert!(matches!(row.into_entry(), Err(LoanError::InvalidPlanTable(_))));
    }

    #[test]
    fn test_unknown_plan_row_rejected() {
        let row = PlanRow {
            plan: "plan9".to_string(),
            threshold: 20_000.0,
            upper_threshold: None,
            repayment_rate: 0.09,
            interest_rate: Some(0.02),
            base_rate: None,
            max_rate: None,
            write_off_years: 25,
        };
        assert!(matches!(row.into_entry(), Err(LoanError::UnknownPlan(_))));
    }

    #[test]
    fn test_missing_directory_reports_path() {
        let err = LoadedAssumptions::load_from(Path::new("no/such/dir")).err().unwrap();
        assert!(err.to_string().contains(PLAN_PARAMETERS_FILE));
    }
}

//! Historical student loan interest rates by academic year

use std::collections::BTreeMap;

use log::debug;

use crate::error::{LoanError, Result};

/// (base, max) interest rates keyed by the year the academic year starts (September)
///
/// Lookups never fail: years before or after the table resolve to the
/// nearest tabulated year, years inside a gap use the preceding entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRates {
    rates: BTreeMap<i32, (f64, f64)>,
}

impl HistoricalRates {
    /// Build from (year, base, max) rows
    ///
    /// Every rate must be finite and non-negative with base no higher than max.
    pub fn new(rows: impl IntoIterator<Item = (i32, f64, f64)>) -> Result<Self> {
        let mut rates = BTreeMap::new();
        for (year, base, max) in rows {
            let valid = base.is_finite() && max.is_finite() && base >= 0.0 && base <= max;
            if !valid {
                return Err(LoanError::InvalidRates { year, base, max });
            }
            rates.insert(year, (base, max));
        }

        if rates.is_empty() {
            return Err(LoanError::EmptyRateTable);
        }
        Ok(Self { rates })
    }

    /// Published rates for 2012/13 through 2024/25 (2021-2023 reflect the caps applied)
    pub fn uk_published() -> Self {
        Self {
            rates: BTreeMap::from([
                (2012, (0.036, 0.066)),
                (2013, (0.033, 0.063)),
                (2014, (0.025, 0.055)),
                (2015, (0.009, 0.039)),
                (2016, (0.016, 0.046)),
                (2017, (0.031, 0.061)),
                (2018, (0.033, 0.063)),
                (2019, (0.024, 0.054)),
                (2020, (0.026, 0.056)),
                (2021, (0.015, 0.045)),
                (2022, (0.045, 0.065)),
                (2023, (0.065, 0.073)),
                (2024, (0.043, 0.073)),
            ]),
        }
    }

    /// Rates in force for a calendar year
    pub fn rates_for_year(&self, calendar_year: i32) -> (f64, f64) {
        // Construction guarantees at least one entry
        let (Some((&first_year, &first)), Some((&last_year, &last))) =
            (self.rates.first_key_value(), self.rates.last_key_value())
        else {
            return (0.0, 0.0);
        };

        if calendar_year <= first_year {
            if calendar_year < first_year {
                debug!("No rates for {}, using {} rates", calendar_year, first_year);
            }
            return first;
        }
        if calendar_year >= last_year {
            return last;
        }

        self.rates
            .range(..=calendar_year)
            .next_back()
            .map(|(_, &rates)| rates)
            .unwrap_or(first)
    }

    pub fn base_rate(&self, calendar_year: i32) -> f64 {
        self.rates_for_year(calendar_year).0
    }

    pub fn max_rate(&self, calendar_year: i32) -> f64 {
        self.rates_for_year(calendar_year).1
    }

    pub fn earliest_year(&self) -> i32 {
        self.rates.keys().next().copied().unwrap_or_default()
    }

    pub fn latest_year(&self) -> i32 {
        self.rates.keys().next_back().copied().unwrap_or_default()
    }

    /// All tabulated (year, base, max) entries in year order
    pub fn entries(&self) -> impl Iterator<Item = (i32, f64, f64)> + '_ {
        self.rates.iter().map(|(&year, &(base, max))| (year, base, max))
    }
}

impl Default for HistoricalRates {
    fn default() -> Self {
        Self::uk_published()
    }
}

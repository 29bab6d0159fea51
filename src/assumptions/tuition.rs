//! Tuition fee brackets by course start year, used to suggest a loan amount

use serde::{Deserialize, Serialize};

/// Average maintenance loan over a three-year course
pub const TYPICAL_MAINTENANCE: f64 = 27_000.0;

/// Fees assumed when a start year falls outside every bracket
const FALLBACK_FEES: TuitionFees = TuitionFees {
    annual: 9_250.0,
    total: 27_750.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuitionFees {
    pub annual: f64,
    pub total: f64,
}

/// Fees for courses starting within an inclusive year range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuitionBracket {
    pub start_year: i32,
    pub end_year: i32,
    pub annual_fee: f64,
    pub typical_total: f64,
}

impl TuitionBracket {
    fn contains(&self, year: i32) -> bool {
        year >= self.start_year && year <= self.end_year
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TuitionFeeTable {
    brackets: Vec<TuitionBracket>,
}

impl TuitionFeeTable {
    pub fn new(brackets: Vec<TuitionBracket>) -> Self {
        Self { brackets }
    }

    /// England fee caps since 1998
    pub fn england() -> Self {
        let bracket = |start_year, end_year, annual_fee, typical_total| TuitionBracket {
            start_year,
            end_year,
            annual_fee,
            typical_total,
        };
        Self {
            brackets: vec![
                bracket(1998, 2005, 1_000.0, 3_000.0),
                bracket(2006, 2011, 3_000.0, 9_000.0),
                bracket(2012, 2016, 9_000.0, 27_000.0),
                bracket(2017, 2024, 9_250.0, 27_750.0),
                bracket(2025, 2030, 9_535.0, 28_605.0),
            ],
        }
    }

    pub fn tuition_for_year(&self, start_year: i32) -> TuitionFees {
        self.brackets
            .iter()
            .find(|b| b.contains(start_year))
            .map(|b| TuitionFees {
                annual: b.annual_fee,
                total: b.typical_total,
            })
            .unwrap_or(FALLBACK_FEES)
    }

    /// Typical total borrowing: tuition plus average maintenance
    pub fn typical_loan_amount(&self, start_year: i32) -> f64 {
        self.tuition_for_year(start_year).total + TYPICAL_MAINTENANCE
    }

    pub fn brackets(&self) -> &[TuitionBracket] {
        &self.brackets
    }
}

impl Default for TuitionFeeTable {
    fn default() -> Self {
        Self::england()
    }
}

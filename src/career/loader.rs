//! Load custom salary milestones from CSV

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use super::profile::{SalaryMilestone, SalaryProfile};
use crate::error::{LoanError, Result};

/// Load an `age,salary` CSV file into a validated profile
pub fn load_milestones(path: &Path) -> Result<SalaryProfile> {
    let file = File::open(path).map_err(|source| LoanError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let profile = load_milestones_from_reader(file)?;
    debug!("Loaded {} milestones from {}", profile.milestones().len(), path.display());
    Ok(profile)
}

/// Load milestones from any reader (for testing or in-memory data)
pub fn load_milestones_from_reader<R: Read>(reader: R) -> Result<SalaryProfile> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let mut milestones = Vec::new();
    for result in csv_reader.deserialize() {
        let milestone: SalaryMilestone = result?;
        milestones.push(milestone);
    }

    SalaryProfile::new(milestones)
}

//! Career salary trajectories: milestone profiles, presets and CSV loading

mod profile;
mod templates;
pub mod loader;

pub use profile::{SalaryMilestone, SalaryProfile, MAX_MILESTONES, MAX_MILESTONE_AGE, MIN_MILESTONE_AGE};
pub use templates::{find, CareerTemplate, CAREER_TEMPLATES};
pub use loader::{load_milestones, load_milestones_from_reader};

// Secret Santa - Core Library
// Draw engine, exclusion rules and data file handling used by the CLI and tests

pub mod config;
pub mod draw;
pub mod error;
pub mod model;
pub mod possibilities;
pub mod report;
pub mod rules;
pub mod solver;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use config::DrawConfig;
pub use draw::DrawEngine;
pub use error::{SantaError, SantaResult};
pub use model::{Assignment, Dataset, Family, HistoryEntry, Population};
pub use possibilities::{calculate_possibilities, Possibilities};
pub use report::{reporter_for, JsonReporter, OutputFormat, Reporter, TextReporter};
pub use rules::{
    ExclusionRule, ReciprocalFamilyExclusion, RecentRecipientExclusion, RuleOutcome, RuleSet,
    SameFamilyExclusion, DEFAULT_RECENT_YEARS,
};
pub use solver::{AssignmentSolver, Solution};
pub use store::{load_dataset, save_dataset};
pub use validation::{DatasetValidator, Severity, ValidationIssue, ValidationReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

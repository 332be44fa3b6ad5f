// ❌ Error Types - Everything the draw can fail with
// Collaborator errors (load/save/report) surface to the caller; solver retries stay internal

use crate::validation::ValidationIssue;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SantaError {
    /// History already holds an entry for the target year
    #[error("There is already an entry for {year}")]
    DuplicateYear { year: i32 },

    /// Every solver attempt painted itself into a corner
    #[error("Could not find a valid assignment after {attempts} attempts")]
    SolverStuck { attempts: u32 },

    /// Dataset file does not exist
    #[error("Could not find {}", path.display())]
    NotFound { path: PathBuf },

    /// Dataset file exists but is not a valid dataset document
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Read or write failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Draw configuration holds a value the engine cannot use
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dataset failed consistency checks
    #[error("Dataset is inconsistent ({} errors)", errors.len())]
    InvalidDataset { errors: Vec<ValidationIssue> },

    /// Reporter could not write its output
    #[error("Report error: {0}")]
    Report(String),
}

pub type SantaResult<T> = Result<T, SantaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_year_message() {
        let err = SantaError::DuplicateYear { year: 2024 };
        assert_eq!(err.to_string(), "There is already an entry for 2024");
    }

    #[test]
    fn test_not_found_message_includes_path() {
        let err = SantaError::NotFound {
            path: PathBuf::from("family.json"),
        };
        assert_eq!(err.to_string(), "Could not find family.json");
    }
}

// 📐 Dataset Validation - Consistency checks before a draw
// Rules trust the dataset; this is where bad data gets caught instead

use crate::error::{SantaError, SantaResult};
use crate::model::Dataset;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

// ============================================================================
// ISSUES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,   // The draw would be wrong or meaningless
    Warning, // Allowed, but probably not what was intended
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    fn error(field: &str, message: String) -> Self {
        ValidationIssue {
            severity: Severity::Error,
            field: field.to_string(),
            message,
        }
    }

    fn warning(field: &str, message: String) -> Self {
        ValidationIssue {
            severity: Severity::Warning,
            field: field.to_string(),
            message,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)
    }
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} errors, {} warnings",
            self.errors().count(),
            self.warnings().count()
        )
    }

    /// Warnings on success, `InvalidDataset` carrying the errors otherwise
    pub fn into_result(self) -> SantaResult<Vec<ValidationIssue>> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self
            .issues
            .into_iter()
            .partition(|i| i.severity == Severity::Error);

        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(SantaError::InvalidDataset { errors })
        }
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

pub struct DatasetValidator;

impl DatasetValidator {
    pub fn validate(dataset: &Dataset) -> ValidationReport {
        let mut issues = Vec::new();

        Self::check_participants(dataset, &mut issues);
        Self::check_families(dataset, &mut issues);
        Self::check_history(dataset, &mut issues);

        ValidationReport { issues }
    }

    fn check_participants(dataset: &Dataset, issues: &mut Vec<ValidationIssue>) {
        let mut seen = HashSet::new();

        for name in dataset.adults.iter().chain(dataset.kids.iter()) {
            if name.trim().is_empty() {
                issues.push(ValidationIssue::error(
                    "participants",
                    "Empty participant name".to_string(),
                ));
            } else if !seen.insert(name.as_str()) {
                issues.push(ValidationIssue::error(
                    "participants",
                    format!("{} is listed more than once", name),
                ));
            }
        }

        for name in dataset.adults.iter().chain(dataset.kids.iter()) {
            if !name.trim().is_empty() && dataset.lookup_family(name).is_none() {
                issues.push(ValidationIssue::warning(
                    "families",
                    format!("{} belongs to no family and can draw anyone", name),
                ));
            }
        }
    }

    fn check_families(dataset: &Dataset, issues: &mut Vec<ValidationIssue>) {
        let mut family_of: HashMap<&str, usize> = HashMap::new();

        for (index, family) in dataset.families.iter().enumerate() {
            for member in family.members() {
                if !dataset.is_participant(member) {
                    issues.push(ValidationIssue::error(
                        "families",
                        format!("Family {} lists unknown participant {}", index + 1, member),
                    ));
                }

                match family_of.get(member.as_str()) {
                    Some(&first) if first != index => issues.push(ValidationIssue::error(
                        "families",
                        format!(
                            "{} is in families {} and {}",
                            member,
                            first + 1,
                            index + 1
                        ),
                    )),
                    Some(_) => {}
                    None => {
                        family_of.insert(member.as_str(), index);
                    }
                }
            }
        }
    }

    fn check_history(dataset: &Dataset, issues: &mut Vec<ValidationIssue>) {
        let mut years = HashSet::new();

        for entry in &dataset.history {
            if !years.insert(entry.year) {
                issues.push(ValidationIssue::error(
                    "history",
                    format!("Year {} appears more than once", entry.year),
                ));
            }

            for a in &entry.assignments {
                if a.from == a.to {
                    issues.push(ValidationIssue::error(
                        "history",
                        format!("{}: {} was assigned to themselves", entry.year, a.from),
                    ));
                }

                for name in [&a.from, &a.to] {
                    if !dataset.is_participant(name) {
                        issues.push(ValidationIssue::warning(
                            "history",
                            format!("{}: {} is no longer a participant", entry.year, name),
                        ));
                    }
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

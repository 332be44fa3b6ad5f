// 🎁 Data Model - Participants, families and gift history
// Field names match the data file layout (PascalCase keys)

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// ASSIGNMENT
// ============================================================================

/// One giver → recipient pair. `from != to` always holds for drawn pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "From")]
    pub from: String,

    #[serde(rename = "To")]
    pub to: String,
}

impl Assignment {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Assignment {
            from: from.into(),
            to: to.into(),
        }
    }
}

// ============================================================================
// HISTORY ENTRY
// ============================================================================

/// Every assignment drawn for one year. Never modified once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "Year")]
    pub year: i32,

    #[serde(rename = "Assignments", default)]
    pub assignments: Vec<Assignment>,
}

impl HistoryEntry {
    pub fn new(year: i32) -> Self {
        HistoryEntry {
            year,
            assignments: Vec::new(),
        }
    }

    /// Who `giver` gave to this year, if they took part
    pub fn recipient_of(&self, giver: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.from == giver)
            .map(|a| a.to.as_str())
    }
}

// ============================================================================
// FAMILY
// ============================================================================

/// Names that must not draw each other. Stored as a bare array in the data file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Family(pub Vec<String>);

impl Family {
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|member| member == name)
    }

    pub fn members(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for Family {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Family(iter.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// POPULATION
// ============================================================================

/// Adults and kids are drawn independently and never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Population {
    Adults,
    Kids,
}

impl Population {
    pub const ALL: [Population; 2] = [Population::Adults, Population::Kids];

    pub fn name(&self) -> &str {
        match self {
            Population::Adults => "adults",
            Population::Kids => "kids",
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// DATASET
// ============================================================================

/// The whole persisted document: participants, families and history (newest first).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "Adults", default)]
    pub adults: Vec<String>,

    #[serde(rename = "Kids", default)]
    pub kids: Vec<String>,

    #[serde(rename = "Families", default)]
    pub families: Vec<Family>,

    #[serde(rename = "History", default)]
    pub history: Vec<HistoryEntry>,
}

impl Dataset {
    pub fn population(&self, population: Population) -> &[String] {
        match population {
            Population::Adults => &self.adults,
            Population::Kids => &self.kids,
        }
    }

    /// First family containing `name`
    pub fn lookup_family(&self, name: &str) -> Option<&Family> {
        self.families.iter().find(|family| family.contains(name))
    }

    pub fn is_participant(&self, name: &str) -> bool {
        self.adults.iter().chain(self.kids.iter()).any(|n| n == name)
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.history.iter().any(|entry| entry.year == year)
    }

    pub fn entry_for(&self, year: i32) -> Option<&HistoryEntry> {
        self.history.iter().find(|entry| entry.year == year)
    }

    /// The `n` newest entries (fewer if history is shorter)
    pub fn recent_entries(&self, n: usize) -> &[HistoryEntry] {
        &self.history[..n.min(self.history.len())]
    }

    pub fn most_recent_entry(&self) -> Option<&HistoryEntry> {
        self.history.first()
    }

    /// Newest first; entries sharing a year keep their relative order
    pub fn sort_history(&mut self) {
        self.history.sort_by(|a, b| b.year.cmp(&a.year));
    }

    pub fn append_entry(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        self.sort_history();
    }
}

// ============================================================================
// TESTS
// ============================================================================

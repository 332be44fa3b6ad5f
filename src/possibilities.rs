// 🧮 Possibility Calculator - Allowed recipients per giver
// Runs every rule over a fresh copy of the population for each giver

use crate::rules::RuleSet;
use std::collections::HashMap;
use tracing::debug;

/// Candidate recipients for each giver of one population.
///
/// `order` is the population order; the solver resolves givers in that order.
/// Candidate order decides nothing semantically, it only feeds the random draw.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Possibilities {
    order: Vec<String>,
    candidates: HashMap<String, Vec<String>>,
}

impl Possibilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the candidates for `giver`. New givers are appended to the order.
    pub fn insert(&mut self, giver: impl Into<String>, candidates: Vec<String>) {
        let giver = giver.into();
        if !self.candidates.contains_key(&giver) {
            self.order.push(giver.clone());
        }
        self.candidates.insert(giver, candidates);
    }

    pub fn givers(&self) -> &[String] {
        &self.order
    }

    pub fn candidates(&self, giver: &str) -> Option<&[String]> {
        self.candidates.get(giver).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Givers left with no candidate at all; no attempt can ever succeed while this is non-empty
    pub fn unmatchable(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter(|giver| self.candidates.get(*giver).map_or(true, Vec::is_empty))
            .map(String::as_str)
            .collect()
    }

    /// Working copy for one solver attempt, in population order
    pub(crate) fn working_copy(&self) -> Vec<Vec<String>> {
        self.order
            .iter()
            .map(|giver| self.candidates.get(giver).cloned().unwrap_or_default())
            .collect()
    }
}

/// Allowed recipients for every giver in `population` after applying `rules`.
///
/// The giver's own name is always dropped, whether or not a rule removed it.
pub fn calculate_possibilities(population: &[String], rules: &RuleSet<'_>) -> Possibilities {
    let mut possibilities = Possibilities::new();

    for giver in population {
        let mut pool = population.to_vec();

        for outcome in rules.apply(&mut pool, giver) {
            if !outcome.removed.is_empty() {
                debug!(giver = %giver, rule = %outcome.rule, removed = ?outcome.removed, "excluded");
            }
        }

        pool.retain(|name| name != giver);
        possibilities.insert(giver.clone(), pool);
    }

    possibilities
}

// ============================================================================
// TESTS
// ============================================================================

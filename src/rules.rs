// 🏷️ Exclusion Rules - Who a giver may not draw
// Each rule strikes names from a giver's candidate pool, reading the dataset it was built from

use crate::model::{Dataset, Family};
use std::collections::BTreeSet;
use tracing::debug;

/// How many past years the "new recipient" rule looks back by default
pub const DEFAULT_RECENT_YEARS: usize = 3;

// ============================================================================
// RULE INTERFACE
// ============================================================================

/// A composable exclusion.
///
/// `remove_excluded` deletes the names this rule forbids for `giver` from `pool`
/// and returns exactly the names it deleted on this call. Names already absent
/// are skipped, so reapplying a rule to a reduced pool is a no-op.
///
/// Rules are purely subtractive, so applying them in any order yields the same
/// pool. A new rule that adds names back or depends on pool contents breaks that
/// and must say so.
pub trait ExclusionRule {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn remove_excluded(&self, pool: &mut Vec<String>, giver: &str) -> BTreeSet<String>;
}

/// Remove every name in `excluded` from `pool`, returning the ones actually present
fn remove_names<'n, I>(pool: &mut Vec<String>, excluded: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'n str>,
{
    let excluded: BTreeSet<&str> = excluded.into_iter().collect();
    let mut removed = BTreeSet::new();

    pool.retain(|name| {
        if excluded.contains(name.as_str()) {
            removed.insert(name.clone());
            false
        } else {
            true
        }
    });

    removed
}

fn family_of<'d>(dataset: &'d Dataset, giver: &str, rule: &str) -> Option<&'d Family> {
    let family = dataset.lookup_family(giver);
    if family.is_none() {
        debug!(rule, giver, "giver has no family, nothing excluded");
    }
    family
}

// ============================================================================
// SAME FAMILY
// ============================================================================

/// Nobody draws a member of their own family (themselves included).
pub struct SameFamilyExclusion<'d> {
    dataset: &'d Dataset,
}

impl<'d> SameFamilyExclusion<'d> {
    pub fn new(dataset: &'d Dataset) -> Self {
        SameFamilyExclusion { dataset }
    }
}

impl ExclusionRule for SameFamilyExclusion<'_> {
    fn name(&self) -> &str {
        "same-family"
    }

    fn description(&self) -> &str {
        "Do not give to your own family"
    }

    fn remove_excluded(&self, pool: &mut Vec<String>, giver: &str) -> BTreeSet<String> {
        match family_of(self.dataset, giver, self.name()) {
            Some(family) => remove_names(pool, family.members().iter().map(String::as_str)),
            None => BTreeSet::new(),
        }
    }
}

// ============================================================================
// RECIPROCAL FAMILY
// ============================================================================

/// Nobody draws someone their family gave to in the most recent year.
pub struct ReciprocalFamilyExclusion<'d> {
    dataset: &'d Dataset,
}

impl<'d> ReciprocalFamilyExclusion<'d> {
    pub fn new(dataset: &'d Dataset) -> Self {
        ReciprocalFamilyExclusion { dataset }
    }
}

impl ExclusionRule for ReciprocalFamilyExclusion<'_> {
    fn name(&self) -> &str {
        "reciprocal-family"
    }

    fn description(&self) -> &str {
        "Do not give to someone your family gave to last time"
    }

    fn remove_excluded(&self, pool: &mut Vec<String>, giver: &str) -> BTreeSet<String> {
        let Some(family) = family_of(self.dataset, giver, self.name()) else {
            return BTreeSet::new();
        };

        // First year: nothing to look back on
        let Some(last) = self.dataset.most_recent_entry() else {
            return BTreeSet::new();
        };

        let recipients = last
            .assignments
            .iter()
            .filter(|a| family.contains(&a.from))
            .map(|a| a.to.as_str());

        remove_names(pool, recipients)
    }
}

// ============================================================================
// RECENT RECIPIENT
// ============================================================================

/// A giver gets someone new compared with each of their last `years` draws.
pub struct RecentRecipientExclusion<'d> {
    dataset: &'d Dataset,
    years: usize,
}

impl<'d> RecentRecipientExclusion<'d> {
    pub fn new(dataset: &'d Dataset) -> Self {
        Self::with_years(dataset, DEFAULT_RECENT_YEARS)
    }

    pub fn with_years(dataset: &'d Dataset, years: usize) -> Self {
        RecentRecipientExclusion { dataset, years }
    }
}

impl ExclusionRule for RecentRecipientExclusion<'_> {
    fn name(&self) -> &str {
        "recent-recipient"
    }

    fn description(&self) -> &str {
        "Draw a new name every year"
    }

    fn remove_excluded(&self, pool: &mut Vec<String>, giver: &str) -> BTreeSet<String> {
        let recipients = self
            .dataset
            .recent_entries(self.years)
            .iter()
            .filter_map(|entry| entry.recipient_of(giver));

        remove_names(pool, recipients)
    }
}

// ============================================================================
// RULE SET
// ============================================================================

/// What a single rule removed for one giver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule: String,
    pub removed: BTreeSet<String>,
}

/// Rules applied in insertion order; later rules see the pool already reduced.
pub struct RuleSet<'d> {
    rules: Vec<Box<dyn ExclusionRule + 'd>>,
}

impl<'d> RuleSet<'d> {
    pub fn new() -> Self {
        RuleSet { rules: Vec::new() }
    }

    /// The fixed rule list used for every draw
    pub fn standard(dataset: &'d Dataset, recent_years: usize) -> Self {
        let mut rules = RuleSet::new();
        rules.add_rule(SameFamilyExclusion::new(dataset));
        rules.add_rule(RecentRecipientExclusion::with_years(dataset, recent_years));
        rules.add_rule(ReciprocalFamilyExclusion::new(dataset));
        rules
    }

    pub fn add_rule<R: ExclusionRule + 'd>(&mut self, rule: R) {
        self.rules.push(Box::new(rule));
    }

    pub fn apply(&self, pool: &mut Vec<String>, giver: &str) -> Vec<RuleOutcome> {
        self.rules
            .iter()
            .map(|rule| RuleOutcome {
                rule: rule.name().to_string(),
                removed: rule.remove_excluded(pool, giver),
            })
            .collect()
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for RuleSet<'_> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

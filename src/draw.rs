// 🎄 Draw Engine - One year's Secret Santa draw
// Adults and kids are matched as two independent problems, then merged into one history entry

use crate::config::DrawConfig;
use crate::error::{SantaError, SantaResult};
use crate::model::{Dataset, HistoryEntry, Population};
use crate::possibilities::calculate_possibilities;
use crate::rules::RuleSet;
use crate::solver::AssignmentSolver;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, info_span, warn};

pub struct DrawEngine<R: Rng> {
    config: DrawConfig,
    rng: R,
}

impl DrawEngine<ChaCha8Rng> {
    /// Engine seeded from `config.seed`, or from OS entropy when unset
    pub fn from_config(config: DrawConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        DrawEngine { config, rng }
    }
}

impl<R: Rng> DrawEngine<R> {
    pub fn new(config: DrawConfig, rng: R) -> Self {
        DrawEngine { config, rng }
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Draw `year`, append it to the dataset's history and return the new entry.
    ///
    /// Fails with `DuplicateYear` before doing any work if `year` was already drawn.
    /// History is put back in newest-first order before the rules read it; apart
    /// from that the dataset is left untouched on error.
    pub fn run(&mut self, dataset: &mut Dataset, year: i32) -> SantaResult<HistoryEntry> {
        let _span = info_span!("draw", year).entered();

        self.config.validate()?;

        if dataset.has_year(year) {
            return Err(SantaError::DuplicateYear { year });
        }

        dataset.sort_history();

        let entry = self.draw(dataset, year)?;

        dataset.append_entry(entry.clone());
        info!(pairs = entry.assignments.len(), "draw complete");

        Ok(entry)
    }

    fn draw(&mut self, dataset: &Dataset, year: i32) -> SantaResult<HistoryEntry> {
        let rules = RuleSet::standard(dataset, self.config.recent_years);
        let mut entry = HistoryEntry::new(year);

        for population in Population::ALL {
            let names = dataset.population(population);
            let possibilities = calculate_possibilities(names, &rules);

            // No attempt can succeed, so don't start one
            let unmatchable = possibilities.unmatchable();
            if !unmatchable.is_empty() {
                warn!(%population, ?unmatchable, "some givers have nobody left to draw");
                return Err(SantaError::SolverStuck { attempts: 0 });
            }

            let solution = AssignmentSolver::new(&mut self.rng)
                .with_max_attempts(self.config.max_attempts)
                .solve(&possibilities)
                .inspect_err(|_| warn!(%population, "no valid assignment"))?;

            info!(%population, givers = names.len(), attempts = solution.attempts, "population matched");
            entry.assignments.extend(solution.assignments);
        }

        Ok(entry)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Assignment, Family};
    use std::collections::HashSet;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    fn create_test_dataset() -> Dataset {
        Dataset {
            adults: names(&["A1", "A2", "B1", "B2", "C1", "C2"]),
            kids: names(&["K1", "K2", "K3"]),
            families: vec![
                Family::from_iter(["A1", "A2", "K1"]),
                Family::from_iter(["B1", "B2", "K2"]),
                Family::from_iter(["C1", "C2", "K3"]),
            ],
            history: Vec::new(),
        }
    }

    fn seeded(seed: u64) -> DrawEngine<ChaCha8Rng> {
        DrawEngine::from_config(DrawConfig::default().with_seed(seed).with_max_attempts(10_000))
    }

    fn assert_population_bijection(entry: &HistoryEntry, population: &[String]) {
        let members: HashSet<&str> = population.iter().map(String::as_str).collect();
        let pairs: Vec<_> = entry
            .assignments
            .iter()
            .filter(|a| members.contains(a.from.as_str()))
            .collect();

        let givers: HashSet<&str> = pairs.iter().map(|a| a.from.as_str()).collect();
        let recipients: HashSet<&str> = pairs.iter().map(|a| a.to.as_str()).collect();

        assert_eq!(pairs.len(), population.len());
        assert_eq!(givers, members);
        assert_eq!(recipients, members);
    }

    #[test]
    fn test_draw_respects_families_and_populations() {
        let mut data = create_test_dataset();
        let entry = seeded(1).run(&mut data, 2024).unwrap();

        assert_eq!(entry.year, 2024);
        assert_eq!(entry.assignments.len(), 9);
        assert_population_bijection(&entry, &data.adults);
        assert_population_bijection(&entry, &data.kids);

        for a in &entry.assignments {
            assert_ne!(a.from, a.to);
            assert!(!data.lookup_family(&a.from).unwrap().contains(&a.to));
        }
        assert_eq!(data.history, vec![entry]);
    }

    #[test]
    fn test_second_year_avoids_last_year() {
        let mut data = create_test_dataset();
        let mut engine = seeded(42);

        let first = engine.run(&mut data, 2024).unwrap();
        let second = engine.run(&mut data, 2025).unwrap();

        for a in &second.assignments {
            assert_ne!(first.recipient_of(&a.from), Some(a.to.as_str()));

            let family = data.lookup_family(&a.from).unwrap();
            let family_gave_to: Vec<&str> = first
                .assignments
                .iter()
                .filter(|prev| family.contains(&prev.from))
                .map(|prev| prev.to.as_str())
                .collect();
            assert!(!family_gave_to.contains(&a.to.as_str()));
        }

        let years: Vec<i32> = data.history.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![2025, 2024]);
    }

    #[test]
    fn test_duplicate_year_rejected() {
        let mut data = create_test_dataset();
        let mut engine = seeded(5);

        engine.run(&mut data, 2024).unwrap();
        let err = engine.run(&mut data, 2024).unwrap_err();

        assert!(matches!(err, SantaError::DuplicateYear { year: 2024 }));
        assert_eq!(data.history.len(), 1);
    }

    fn single_family_couple() -> Dataset {
        Dataset {
            adults: names(&["A", "B"]),
            kids: Vec::new(),
            families: vec![Family::from_iter(["A", "B"])],
            history: Vec::new(),
        }
    }

    #[test]
    fn test_single_family_couple_gets_stuck() {
        let mut data = single_family_couple();
        let mut engine =
            DrawEngine::from_config(DrawConfig::default().with_seed(0).with_max_attempts(50));

        let err = engine.run(&mut data, 2024).unwrap_err();

        assert!(matches!(err, SantaError::SolverStuck { attempts: 0 }));
        assert!(data.history.is_empty());
    }

    #[test]
    fn test_unbounded_draw_fails_fast_when_someone_has_no_candidates() {
        let mut data = single_family_couple();
        let mut engine = DrawEngine::from_config(DrawConfig::default().with_seed(0));
        assert_eq!(engine.config().max_attempts, None);

        let err = engine.run(&mut data, 2024).unwrap_err();

        assert!(matches!(err, SantaError::SolverStuck { attempts: 0 }));
        assert!(data.history.is_empty());
    }

    #[test]
    fn test_out_of_order_history_uses_latest_year() {
        let data = Dataset {
            adults: names(&["A", "B", "C", "D"]),
            kids: Vec::new(),
            families: Vec::new(),
            history: vec![
                HistoryEntry {
                    year: 2020,
                    assignments: vec![Assignment::new("A", "B")],
                },
                HistoryEntry {
                    year: 2024,
                    assignments: vec![Assignment::new("A", "C")],
                },
            ],
        };

        for seed in 0..20 {
            let mut engine = DrawEngine::from_config(
                DrawConfig::default()
                    .with_seed(seed)
                    .with_max_attempts(10_000)
                    .with_recent_years(1),
            );
            let mut attempt = data.clone();

            let entry = engine.run(&mut attempt, 2025).unwrap();

            assert_ne!(entry.recipient_of("A"), Some("C"));
            let years: Vec<i32> = attempt.history.iter().map(|e| e.year).collect();
            assert_eq!(years, vec![2025, 2024, 2020]);
        }
    }

    #[test]
    fn test_zero_max_attempts_rejected() {
        let mut data = create_test_dataset();
        data.adults.clear();
        data.kids.clear();
        let mut engine = DrawEngine::from_config(DrawConfig::default().with_max_attempts(0));

        assert!(matches!(
            engine.run(&mut data, 2024),
            Err(SantaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_same_seed_same_draw() {
        let mut first = create_test_dataset();
        let mut second = create_test_dataset();

        let a = seeded(99).run(&mut first, 2024).unwrap();
        let b = seeded(99).run(&mut second, 2024).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_kids_population() {
        let mut data = create_test_dataset();
        data.kids.clear();

        let entry = seeded(3).run(&mut data, 2024).unwrap();

        assert_eq!(entry.assignments.len(), 6);
    }

    #[test]
    fn test_new_entry_sorted_among_older_history() {
        let mut data = create_test_dataset();
        data.history = vec![HistoryEntry::new(2030), HistoryEntry::new(2010)];

        seeded(8).run(&mut data, 2020).unwrap();

        let years: Vec<i32> = data.history.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![2030, 2020, 2010]);
    }

    #[test]
    fn test_demo_data_file_draws_next_year() {
        let mut data: Dataset = serde_json::from_str(include_str!("../demos/family.json")).unwrap();

        let entry = seeded(2026).run(&mut data, 2026).unwrap();

        assert_eq!(entry.assignments.len(), 9);
        assert_eq!(data.history.len(), 2);
        assert_eq!(data.history[0].year, 2026);
        assert!(matches!(
            seeded(2026).run(&mut data, 2025),
            Err(SantaError::DuplicateYear { year: 2025 })
        ));
    }
}

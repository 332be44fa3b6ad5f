// 🎲 Assignment Solver - Randomized greedy matching with whole-attempt retry
//
// One attempt walks the givers in population order. For each giver it draws a
// random candidate and commits it only if no other giver would be left without
// candidates. A candidate that fails that check is struck from the giver's own
// list; when the list runs dry the attempt is thrown away and a fresh one starts
// from the untouched possibilities.

use crate::error::{SantaError, SantaResult};
use crate::model::Assignment;
use crate::possibilities::Possibilities;
use rand::Rng;
use tracing::{debug, warn};

// ============================================================================
// SOLUTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// One pair per giver, in population order
    pub assignments: Vec<Assignment>,

    /// Attempts used, including the successful one
    pub attempts: u32,
}

/// Why one attempt was abandoned
#[derive(Debug, Clone, PartialEq, Eq)]
struct Stuck {
    giver: String,
}

// ============================================================================
// SOLVER
// ============================================================================

pub struct AssignmentSolver<R: Rng> {
    rng: R,

    /// None retries forever
    max_attempts: Option<u32>,
}

impl<R: Rng> AssignmentSolver<R> {
    /// Unbounded solver drawing from `rng`
    pub fn new(rng: R) -> Self {
        AssignmentSolver {
            rng,
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Find a giver → recipient bijection drawn from `possibilities`.
    ///
    /// Every giver gives exactly once, every giver receives exactly once,
    /// nobody draws themselves and every recipient comes from the giver's
    /// candidate list. Fails with `SolverStuck` once `max_attempts` attempts
    /// have all been abandoned.
    pub fn solve(&mut self, possibilities: &Possibilities) -> SantaResult<Solution> {
        let mut attempts = 0u32;

        loop {
            if let Some(max) = self.max_attempts {
                if attempts >= max {
                    warn!(attempts, "giving up on assignment");
                    return Err(SantaError::SolverStuck { attempts });
                }
            }

            attempts += 1;

            match self.attempt(possibilities) {
                Ok(assignments) => {
                    debug!(attempts, givers = assignments.len(), "assignment found");
                    return Ok(Solution {
                        assignments,
                        attempts,
                    });
                }
                Err(stuck) => {
                    debug!(attempt = attempts, giver = %stuck.giver, "ran out of choices, trying again");
                }
            }
        }
    }

    fn attempt(&mut self, possibilities: &Possibilities) -> Result<Vec<Assignment>, Stuck> {
        let givers = possibilities.givers();
        let mut working = possibilities.working_copy();

        for current in 0..givers.len() {
            let giver = &givers[current];

            loop {
                if working[current].is_empty() {
                    return Err(Stuck {
                        giver: giver.clone(),
                    });
                }

                let idx = self.rng.gen_range(0..working[current].len());
                let choice = working[current][idx].clone();

                let removable = choice != *giver
                    && working.iter().enumerate().all(|(other, candidates)| {
                        other == current || candidates.len() > 1 || !candidates.contains(&choice)
                    });

                if removable {
                    for (other, candidates) in working.iter_mut().enumerate() {
                        if other != current {
                            candidates.retain(|name| *name != choice);
                        }
                    }
                    working[current] = vec![choice];
                    break;
                }

                working[current].remove(idx);
            }
        }

        Ok(givers
            .iter()
            .zip(working)
            .map(|(giver, mut chosen)| Assignment {
                from: giver.clone(),
                to: chosen.remove(0),
            })
            .collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    fn everyone_but_self(population: &[String]) -> Possibilities {
        let mut possibilities = Possibilities::new();
        for giver in population {
            let others = population.iter().filter(|n| *n != giver).cloned().collect();
            possibilities.insert(giver.clone(), others);
        }
        possibilities
    }

    fn assert_valid(possibilities: &Possibilities, solution: &Solution) {
        let givers: HashSet<&str> = solution.assignments.iter().map(|a| a.from.as_str()).collect();
        let recipients: HashSet<&str> = solution.assignments.iter().map(|a| a.to.as_str()).collect();
        let population: HashSet<&str> = possibilities.givers().iter().map(String::as_str).collect();

        assert_eq!(solution.assignments.len(), possibilities.len());
        assert_eq!(givers, population);
        assert_eq!(recipients, population);

        for a in &solution.assignments {
            assert_ne!(a.from, a.to);
            assert!(possibilities.candidates(&a.from).unwrap().contains(&a.to));
        }
    }

    #[test]
    fn test_solution_is_bijection() {
        let population = names(&["A", "B", "C", "D", "E", "F"]);
        let possibilities = everyone_but_self(&population);
        let mut solver = AssignmentSolver::new(ChaCha8Rng::seed_from_u64(7));

        let solution = solver.solve(&possibilities).unwrap();

        assert_valid(&possibilities, &solution);
        assert!(solution.attempts >= 1);
    }

    #[test]
    fn test_forced_chain() {
        // Only one valid assignment exists: A→B→C→A
        let mut possibilities = Possibilities::new();
        possibilities.insert("A", names(&["B", "C"]));
        possibilities.insert("B", names(&["C"]));
        possibilities.insert("C", names(&["A", "B"]));
        let mut solver = AssignmentSolver::new(ChaCha8Rng::seed_from_u64(1));

        let solution = solver.solve(&possibilities).unwrap();

        assert_eq!(
            solution.assignments,
            vec![
                Assignment::new("A", "B"),
                Assignment::new("B", "C"),
                Assignment::new("C", "A"),
            ]
        );
    }

    #[test]
    fn test_self_candidate_is_never_committed() {
        let mut possibilities = Possibilities::new();
        possibilities.insert("A", names(&["A", "B"]));
        possibilities.insert("B", names(&["A", "B"]));

        for seed in 0..20 {
            let mut solver = AssignmentSolver::new(ChaCha8Rng::seed_from_u64(seed));
            let solution = solver.solve(&possibilities).unwrap();
            assert_eq!(
                solution.assignments,
                vec![Assignment::new("A", "B"), Assignment::new("B", "A")]
            );
        }
    }

    #[test]
    fn test_same_seed_same_solution() {
        let population = names(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        let possibilities = everyone_but_self(&population);

        let first = AssignmentSolver::new(ChaCha8Rng::seed_from_u64(2024))
            .solve(&possibilities)
            .unwrap();
        let second = AssignmentSolver::new(ChaCha8Rng::seed_from_u64(2024))
            .solve(&possibilities)
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_candidates_bounded_attempts() {
        let mut possibilities = Possibilities::new();
        possibilities.insert("A", Vec::new());
        possibilities.insert("B", Vec::new());
        let mut solver =
            AssignmentSolver::new(ChaCha8Rng::seed_from_u64(3)).with_max_attempts(Some(25));

        let err = solver.solve(&possibilities).unwrap_err();

        assert!(matches!(err, SantaError::SolverStuck { attempts: 25 }));
    }

    #[test]
    fn test_impossible_without_empty_lists() {
        // Both givers can only give to C, C cannot be given to twice
        let mut possibilities = Possibilities::new();
        possibilities.insert("A", names(&["C"]));
        possibilities.insert("B", names(&["C"]));
        possibilities.insert("C", names(&["A"]));
        let mut solver =
            AssignmentSolver::new(ChaCha8Rng::seed_from_u64(9)).with_max_attempts(Some(10));

        assert!(matches!(
            solver.solve(&possibilities),
            Err(SantaError::SolverStuck { attempts: 10 })
        ));
    }

    #[test]
    fn test_empty_population_solves_immediately() {
        let mut solver = AssignmentSolver::new(ChaCha8Rng::seed_from_u64(0));
        let solution = solver.solve(&Possibilities::new()).unwrap();

        assert!(solution.assignments.is_empty());
        assert_eq!(solution.attempts, 1);
    }

    proptest! {
        #[test]
        fn prop_solution_respects_possibilities(size in 2usize..10, seed in any::<u64>()) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut population: Vec<String> = (0..size).map(|i| format!("P{i}")).collect();
            population.shuffle(&mut rng);

            // A cycle through the shuffled population guarantees a solution exists
            let mut possibilities = Possibilities::new();
            for (i, giver) in population.iter().enumerate() {
                let target = population[(i + 1) % size].clone();
                let mut candidates: Vec<String> = population
                    .iter()
                    .filter(|n| *n != giver && **n != target && rng.gen_bool(0.3))
                    .cloned()
                    .collect();
                candidates.push(target);
                candidates.shuffle(&mut rng);
                possibilities.insert(giver.clone(), candidates);
            }

            let solution = AssignmentSolver::new(ChaCha8Rng::seed_from_u64(seed ^ 0x5eed))
                .solve(&possibilities)
                .unwrap();

            assert_valid(&possibilities, &solution);
        }
    }
}

//! Breadth-first search over the implicit graph of bucket states.
//!
//! The graph is never materialized: nodes are [`State`] values and edges are
//! the single-action transitions produced by [`State::successors`]. BFS
//! guarantees the returned path has the minimum number of actions; the
//! fixed successor order makes it deterministic as well. The state space is
//! finite (each level is bounded by its capacity), so an unsolvable puzzle
//! exhausts the frontier instead of looping.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use tracing::debug;

use crate::state::{PuzzleConfig, State};

/// Outcome of one search, with counters for diagnostics.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Shortest path from the initial state to a goal state, both inclusive.
    /// `None` means the reachable space was exhausted without a goal.
    pub path: Option<Vec<State>>,
    /// Number of states popped from the frontier.
    pub states_explored: usize,
    /// Wall-clock time of the search in milliseconds.
    pub time_elapsed_ms: u64,
}

impl SearchResult {
    pub fn is_solved(&self) -> bool {
        self.path.is_some()
    }

    /// Number of actions in the solution (one less than the state count).
    /// Zero when the initial state already satisfies the goal.
    pub fn moves(&self) -> Option<usize> {
        self.path.as_ref().map(|path| path.len() - 1)
    }
}

/// Find a shortest action sequence from `initial` to any goal state.
///
/// The returned path runs `[initial, ..., goal]` in traversal order. A goal
/// satisfied by `initial` itself yields a one-state path; an unreachable
/// target yields `path: None` once the frontier empties.
pub fn breadth_first_search(config: &PuzzleConfig, initial: State) -> SearchResult {
    let start_time = Instant::now();
    debug!(
        capacities = ?config.capacities,
        target = config.target,
        allow_refills = config.allow_refills,
        "starting search"
    );

    // Keys double as the visited set; values are predecessor pointers, with
    // None marking the root.
    let mut predecessors: HashMap<State, Option<State>> = HashMap::new();
    predecessors.insert(initial.clone(), None);

    let mut frontier: VecDeque<State> = VecDeque::new();
    frontier.push_back(initial);

    let mut states_explored: usize = 0;

    while let Some(state) = frontier.pop_front() {
        states_explored += 1;

        if state.is_goal(config) {
            let path = unravel(state, &predecessors);
            debug!(states_explored, moves = path.len() - 1, "goal reached");
            return SearchResult {
                path: Some(path),
                states_explored,
                time_elapsed_ms: start_time.elapsed().as_millis() as u64,
            };
        }

        for successor in state.successors(config) {
            if !predecessors.contains_key(&successor) {
                predecessors.insert(successor.clone(), Some(state.clone()));
                frontier.push_back(successor);
            }
        }
    }

    debug!(states_explored, "state space exhausted without reaching the target");
    SearchResult {
        path: None,
        states_explored,
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    }
}

/// Walk predecessor pointers from the goal back to the root.
fn unravel(goal: State, predecessors: &HashMap<State, Option<State>>) -> Vec<State> {
    let mut path = Vec::new();
    let mut current = goal;
    loop {
        path.push(current.clone());
        match predecessors.get(&current) {
            Some(Some(previous)) => current = previous.clone(),
            _ => break,
        }
    }
    path.reverse();
    path
}

/// Number of states on the shortest solution, or `None` when unsolvable.
///
/// Used as a difficulty measure when comparing puzzles: more states on the
/// minimal path means a deeper search tree.
pub fn puzzle_difficulty(config: &PuzzleConfig, initial: State) -> Option<usize> {
    breadth_first_search(config, initial).path.map(|path| path.len())
}

/// Scan all two-bucket puzzles with capacities and target in
/// `1..=max_capacity`, starting from empty buckets, and return the solvable
/// one with the deepest minimal solution together with that solution.
///
/// Ties keep the first puzzle found, in (capacity, capacity, target)
/// lexicographic scan order.
pub fn hardest_puzzle(max_capacity: u32) -> Option<(PuzzleConfig, Vec<State>)> {
    let mut best: Option<(PuzzleConfig, Vec<State>)> = None;

    for cap_a in 1..=max_capacity {
        for cap_b in 1..=max_capacity {
            for target in 1..=max_capacity {
                let Ok(config) = PuzzleConfig::new(vec![cap_a, cap_b], target, true) else {
                    continue;
                };
                let initial = State::empty(&config);
                let Some(path) = breadth_first_search(&config, initial).path else {
                    continue;
                };
                let deeper = best
                    .as_ref()
                    .map_or(true, |(_, best_path)| path.len() > best_path.len());
                if deeper {
                    debug!(
                        capacities = ?config.capacities,
                        target = config.target,
                        states = path.len(),
                        "new deepest puzzle"
                    );
                    best = Some((config, path));
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(capacities: Vec<u32>, target: u32, allow_refills: bool) -> SearchResult {
        let config = PuzzleConfig::new(capacities, target, allow_refills).unwrap();
        breadth_first_search(&config, State::empty(&config))
    }

    fn path_levels(result: &SearchResult) -> Vec<Vec<u32>> {
        result
            .path
            .as_ref()
            .unwrap()
            .iter()
            .map(|state| state.levels().to_vec())
            .collect()
    }

    #[test]
    fn test_classic_die_hard_puzzle() {
        let result = solve(vec![5, 3], 4, true);
        assert_eq!(
            path_levels(&result),
            vec![
                vec![0, 0],
                vec![5, 0],
                vec![2, 3],
                vec![2, 0],
                vec![0, 2],
                vec![5, 2],
                vec![4, 3],
            ]
        );
        assert_eq!(result.moves(), Some(6));
    }

    #[test]
    fn test_goal_at_initial_state_gives_zero_moves() {
        let config = PuzzleConfig::new(vec![5, 3], 4, true).unwrap();
        let initial = State::new(&[4, 0], &config).unwrap();
        let result = breadth_first_search(&config, initial.clone());
        assert_eq!(result.path, Some(vec![initial]));
        assert_eq!(result.moves(), Some(0));
    }

    #[test]
    fn test_unreachable_target_reports_no_solution() {
        // Target exceeds every capacity; the search must terminate by
        // exhausting the finite reachable space.
        let result = solve(vec![4, 2], 5, true);
        assert!(result.path.is_none());
        assert!(!result.is_solved());
        assert_eq!(result.moves(), None);
        assert!(result.states_explored > 0);
    }

    #[test]
    fn test_parity_locked_target_reports_no_solution() {
        // Even capacities can only ever produce even amounts.
        let result = solve(vec![4, 2], 3, true);
        assert!(result.path.is_none());
    }

    #[test]
    fn test_every_path_state_respects_capacities() {
        let config = PuzzleConfig::new(vec![10, 7, 4], 2, true).unwrap();
        let result = breadth_first_search(&config, State::empty(&config));
        for state in result.path.as_ref().unwrap() {
            for (level, capacity) in state.levels().iter().zip(config.capacities.iter()) {
                assert!(level <= capacity);
            }
        }
    }

    #[test]
    fn test_search_is_deterministic() {
        let first = solve(vec![8, 5, 3], 4, true);
        let second = solve(vec![8, 5, 3], 4, true);
        assert_eq!(first.path, second.path);
    }

    #[test]
    fn test_path_minimality_on_small_puzzle() {
        // Exhaustive check: no sequence of 3 or fewer actions reaches the
        // target, so the minimal path must use 4.
        let config = PuzzleConfig::new(vec![3, 5], 4, true).unwrap();
        let result = breadth_first_search(&config, State::empty(&config));
        let moves = result.moves().unwrap();

        let mut reachable = vec![State::empty(&config)];
        for depth in 0..moves {
            assert!(
                !reachable.iter().any(|state| state.is_goal(&config)),
                "goal reachable in {depth} moves, BFS reported {moves}"
            );
            reachable = reachable
                .iter()
                .flat_map(|state| state.successors(&config))
                .collect();
        }
        assert!(reachable.iter().any(|state| state.is_goal(&config)));
    }

    #[test]
    fn test_no_refill_variant_is_no_shorter_and_never_refills() {
        let with_refills = solve(vec![5, 3], 4, true);
        let without = solve(vec![5, 3], 4, false);
        assert!(without.is_solved());
        assert!(without.moves().unwrap() >= with_refills.moves().unwrap());

        // Replay the path and check no fill targets a bucket that a prior
        // Empty action drained.
        let config = PuzzleConfig::new(vec![5, 3], 4, false).unwrap();
        let path = without.path.as_ref().unwrap();
        let mut drained = vec![false; config.bucket_count()];
        for pair in path.windows(2) {
            let (before, after) = (pair[0].levels(), pair[1].levels());
            let changed: Vec<usize> = (0..before.len()).filter(|&i| before[i] != after[i]).collect();
            if changed.len() == 2 {
                continue; // a pour, no external source involved
            }
            let i = changed[0];
            if after[i] == 0 {
                drained[i] = true;
            } else {
                assert_eq!(after[i], config.capacities[i]);
                assert!(!drained[i], "filled bucket {i} after it was drained");
            }
        }
    }

    #[test]
    fn test_extra_bucket_never_hurts() {
        // A third bucket only adds moves to choose from; the minimum cannot
        // exceed the best two-bucket subset's.
        let two = solve(vec![5, 3], 4, true);
        let three = solve(vec![5, 3, 7], 4, true);
        assert!(three.moves().unwrap() <= two.moves().unwrap());
    }

    #[test]
    fn test_puzzle_difficulty_counts_path_states() {
        let config = PuzzleConfig::new(vec![5, 3], 4, true).unwrap();
        assert_eq!(puzzle_difficulty(&config, State::empty(&config)), Some(7));

        let impossible = PuzzleConfig::new(vec![4, 2], 5, true).unwrap();
        assert_eq!(puzzle_difficulty(&impossible, State::empty(&impossible)), None);
    }

    #[test]
    fn test_hardest_puzzle_trivial_scan() {
        // With unit capacities the only puzzle is "fill the bucket".
        let (config, path) = hardest_puzzle(1).unwrap();
        assert_eq!(config.capacities, vec![1, 1]);
        assert_eq!(config.target, 1);
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_hardest_puzzle_paths_end_in_goal() {
        let (config, path) = hardest_puzzle(4).unwrap();
        assert!(path.last().unwrap().is_goal(&config));
        assert!(path.len() >= 2);
    }
}

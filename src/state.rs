//! Puzzle configuration and bucket state types.
//!
//! A [`PuzzleConfig`] holds the static parameters of one puzzle (bucket
//! capacities, target amount, refill policy) and is shared by reference
//! across every state of a search. A [`State`] is an immutable snapshot of
//! the water levels, compared and hashed by value so the search engine can
//! use it directly as a graph-node key.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Most puzzles have two or three buckets; keep their levels inline.
pub type Levels = SmallVec<[u32; 4]>;

/// Upper limit on bucket count, set by the width of the drained bitmask.
pub const MAX_BUCKETS: usize = 32;

/// Rejected puzzle or state parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidConfiguration {
    #[error("puzzle has no buckets")]
    NoBuckets,
    #[error("puzzle has {0} buckets, at most {MAX_BUCKETS} are supported")]
    TooManyBuckets(usize),
    #[error("bucket {index} has zero capacity")]
    ZeroCapacity { index: usize },
    #[error("target amount must be positive")]
    ZeroTarget,
    #[error("got {levels} initial levels for {buckets} buckets")]
    LengthMismatch { levels: usize, buckets: usize },
    #[error("bucket {index} holds {level}, over its capacity of {capacity}")]
    LevelExceedsCapacity {
        index: usize,
        level: u32,
        capacity: u32,
    },
}

/// Static parameters of one puzzle, shared across all states of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleConfig {
    /// Capacity of each bucket, in order. All capacities are positive.
    pub capacities: Vec<u32>,
    /// The puzzle is solved once any bucket holds exactly this amount.
    pub target: u32,
    /// Whether buckets may be refilled from the external source.
    ///
    /// When false, a bucket that has been emptied with an [`Empty`] action
    /// loses access to the external source for the rest of the search path.
    /// A pour that happens to leave its source at zero does not, and buckets
    /// that merely start at zero may still be filled once. Refill
    /// eligibility is part of state identity (see [`State`]), so two paths
    /// reaching the same levels with different drain histories are kept
    /// distinct.
    ///
    /// [`Empty`]: State::successors
    #[serde(default = "default_allow_refills")]
    pub allow_refills: bool,
}

fn default_allow_refills() -> bool {
    true
}

impl PuzzleConfig {
    /// Create a validated configuration.
    pub fn new(
        capacities: Vec<u32>,
        target: u32,
        allow_refills: bool,
    ) -> Result<Self, InvalidConfiguration> {
        let config = Self {
            capacities,
            target,
            allow_refills,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a deserialized configuration may violate.
    pub fn validate(&self) -> Result<(), InvalidConfiguration> {
        if self.capacities.is_empty() {
            return Err(InvalidConfiguration::NoBuckets);
        }
        if self.capacities.len() > MAX_BUCKETS {
            return Err(InvalidConfiguration::TooManyBuckets(self.capacities.len()));
        }
        for (index, &capacity) in self.capacities.iter().enumerate() {
            if capacity == 0 {
                return Err(InvalidConfiguration::ZeroCapacity { index });
            }
        }
        if self.target == 0 {
            return Err(InvalidConfiguration::ZeroTarget);
        }
        Ok(())
    }

    /// Number of buckets in the puzzle.
    pub fn bucket_count(&self) -> usize {
        self.capacities.len()
    }
}

/// One assignment of water levels to all buckets.
///
/// States are immutable values: every action produces a new state. Equality
/// and hashing cover the levels plus the drained bitmask, which stays zero
/// whenever refills are allowed, so under the default policy two states with
/// identical levels are the same graph node regardless of how they were
/// reached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct State {
    levels: Levels,
    /// Bit i set = bucket i was emptied by an Empty action since the search
    /// began. Only maintained when refills are disabled.
    drained: u32,
}

impl State {
    /// Create a state from initial levels, checked against the configuration.
    pub fn new(levels: &[u32], config: &PuzzleConfig) -> Result<Self, InvalidConfiguration> {
        config.validate()?;
        if levels.len() != config.capacities.len() {
            return Err(InvalidConfiguration::LengthMismatch {
                levels: levels.len(),
                buckets: config.capacities.len(),
            });
        }
        for (index, (&level, &capacity)) in
            levels.iter().zip(config.capacities.iter()).enumerate()
        {
            if level > capacity {
                return Err(InvalidConfiguration::LevelExceedsCapacity {
                    index,
                    level,
                    capacity,
                });
            }
        }
        Ok(Self {
            levels: Levels::from_slice(levels),
            drained: 0,
        })
    }

    /// The all-empty state for a validated configuration.
    pub fn empty(config: &PuzzleConfig) -> Self {
        Self {
            levels: smallvec::smallvec![0; config.capacities.len()],
            drained: 0,
        }
    }

    /// Current water level of each bucket, in order.
    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    /// Whether bucket `index` has been emptied since the search began.
    pub fn has_been_drained(&self, index: usize) -> bool {
        self.drained & (1 << index) != 0
    }

    /// True if any bucket holds exactly the target amount.
    pub fn is_goal(&self, config: &PuzzleConfig) -> bool {
        self.levels.iter().any(|&level| level == config.target)
    }

    /// All states reachable from this one by a single legal action.
    ///
    /// Actions are generated in a fixed order: Fill for each bucket in index
    /// order, then Empty for each bucket in index order, then Pour for each
    /// ordered pair (i, j) in lexicographic order. No-op actions (filling a
    /// full bucket, emptying an empty one, pouring nothing) are skipped. The
    /// result may contain value-duplicates; the caller is expected to filter
    /// against its visited set.
    pub fn successors(&self, config: &PuzzleConfig) -> Vec<State> {
        let buckets = self.levels.len();
        let mut next = Vec::new();

        for i in 0..buckets {
            if self.levels[i] < config.capacities[i] && self.can_fill(i, config) {
                next.push(self.fill(i, config));
            }
        }
        for i in 0..buckets {
            if self.levels[i] > 0 {
                next.push(self.empty_bucket(i, config));
            }
        }
        for i in 0..buckets {
            for j in 0..buckets {
                if i == j {
                    continue;
                }
                let amount = self.levels[i].min(config.capacities[j] - self.levels[j]);
                if amount > 0 {
                    next.push(self.pour(i, j, amount));
                }
            }
        }

        next
    }

    fn can_fill(&self, index: usize, config: &PuzzleConfig) -> bool {
        config.allow_refills || !self.has_been_drained(index)
    }

    fn fill(&self, index: usize, config: &PuzzleConfig) -> State {
        let mut levels = self.levels.clone();
        levels[index] = config.capacities[index];
        State {
            levels,
            drained: self.drained,
        }
    }

    fn empty_bucket(&self, index: usize, config: &PuzzleConfig) -> State {
        let mut levels = self.levels.clone();
        levels[index] = 0;
        let mut drained = self.drained;
        if !config.allow_refills {
            drained |= 1 << index;
        }
        State { levels, drained }
    }

    fn pour(&self, from: usize, to: usize, amount: u32) -> State {
        let mut levels = self.levels.clone();
        levels[from] -= amount;
        levels[to] += amount;
        State {
            levels,
            drained: self.drained,
        }
    }
}

impl std::fmt::Display for State {
    /// Tuple-style rendering of the levels, e.g. `(5, 3)` or `(7,)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.levels.as_slice() {
            [only] => write!(f, "({only},)"),
            levels => {
                write!(f, "(")?;
                for (i, level) in levels.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{level}")?;
                }
                write!(f, ")")
            }
        }
    }
}

//! Shortest-path solver for the generalized water bucket puzzle, also known
//! as the Die Hard puzzle from the movie that popularized it.
//!
//! Given buckets with fixed capacities, an initial fill state, and a target
//! amount, the solver finds a shortest sequence of fill/empty/pour actions
//! that leaves the target amount in some bucket, or reports that none
//! exists. The search is a breadth-first traversal of the implicit graph of
//! bucket states, so the returned path is minimal in action count and
//! deterministic. Other traversal orders would also find solutions, but
//! only BFS carries the minimality guarantee.

pub mod render;
pub mod search;
pub mod state;

// Re-export main types
pub use render::render_path;
pub use search::{breadth_first_search, hardest_puzzle, puzzle_difficulty, SearchResult};
pub use state::{InvalidConfiguration, Levels, PuzzleConfig, State, MAX_BUCKETS};

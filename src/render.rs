//! Presentation of solution paths.
//!
//! Rendering carries no algorithmic content: it turns a path of states into
//! a single line of tuples. The root state is preceded by an empty `()`
//! marker standing for "no prior state".

use crate::state::State;

/// Marker printed before the root state of a path.
pub const NO_PRIOR_STATE: &str = "()";

/// Render a solution path as one line, e.g.
/// `[(), (0, 0), (5, 0), (2, 3), (2, 0), (0, 2), (5, 2), (4, 3)]`.
///
/// An empty path (the no-solution outcome) renders as `[]`.
pub fn render_path(path: &[State]) -> String {
    if path.is_empty() {
        return "[]".to_string();
    }
    let mut entries = vec![NO_PRIOR_STATE.to_string()];
    entries.extend(path.iter().map(State::to_string));
    format!("[{}]", entries.join(", "))
}

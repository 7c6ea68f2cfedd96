//! Evaluation trace types for debugging case behavior.
//!
//! Use [`Case::evaluate_with_trace`](crate::Case::evaluate_with_trace) to see
//! which arms were consulted and which one fired.
//!
//! # Example
//!
//! ```
//! use typematcher::{case_when, is_number, is_string, Value};
//!
//! let case = case_when(is_string(), |_: &Value| "s").case_when(is_number(), |_: &Value| "n");
//! let trace = case.evaluate_with_trace(&Value::from(1));
//!
//! for step in &trace.steps {
//!     println!("  arm[{}] {}: matched={}", step.index, step.guard, step.matched);
//! }
//! assert_eq!(trace.matched_index(), Some(1));
//! ```

use crate::{CaseOutcome, MatchError};
use std::fmt;

/// Trace of a full case evaluation.
///
/// # INV: `outcome` == `try_match()` result
///
/// The `outcome` field always equals what
/// [`Case::try_match`](crate::Case::try_match) returns for the same input.
pub struct EvalTrace<R> {
    /// The final outcome (identical to what `try_match()` returns).
    pub outcome: Result<CaseOutcome<R>, MatchError>,
    /// Each arm that was consulted, in order.
    /// Stops after the first match (preserves first-match-wins).
    pub steps: Vec<EvalStep>,
}

impl<R> EvalTrace<R> {
    /// Index of the arm that accepted the value, if any.
    #[must_use]
    pub fn matched_index(&self) -> Option<usize> {
        self.steps.iter().find(|s| s.matched).map(|s| s.index)
    }
}

impl<R: fmt::Debug> fmt::Debug for EvalTrace<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalTrace")
            .field("outcome", &self.outcome)
            .field("steps", &self.steps)
            .finish()
    }
}

/// One arm's evaluation in a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalStep {
    /// Index of the arm in the chain (0-based).
    pub index: usize,
    /// Name of the arm's guard, `<always>` for unconditional arms.
    pub guard: String,
    /// Did the guard accept the value?
    pub matched: bool,
}

impl fmt::Display for EvalStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.matched { "✓" } else { "✗" };
        write!(f, "[{}] {mark} {}", self.index, self.guard)
    }
}

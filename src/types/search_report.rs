use std::fmt;
use std::time::Duration;

use super::condition::Outcome;
use super::conditions::Conditions;

/// One decision taken while walking a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    want: Conditions,
    matched: bool,
}

impl Decision {
    pub(crate) fn new(want: Conditions, matched: bool) -> Self {
        Self { want, matched }
    }

    /// The conditions the visited node tested.
    #[must_use]
    pub fn want(&self) -> &Conditions {
        &self.want
    }

    /// Whether all of them were present, i.e. the walk took the match branch.
    #[must_use]
    pub fn matched(&self) -> bool {
        self.matched
    }
}

/// Detailed search report returned by
/// [`Tree::search_detailed()`](super::tree::Tree::search_detailed).
///
/// Contains the outcome, every decision taken on the way from the root to
/// the leaf, and the wall-clock duration of the walk.
#[derive(Debug, Clone)]
#[must_use]
pub struct SearchReport {
    outcome: Outcome,
    path: Vec<Decision>,
    duration: Duration,
}

impl SearchReport {
    pub(crate) fn new(outcome: Outcome, path: Vec<Decision>, duration: Duration) -> Self {
        Self {
            outcome,
            path,
            duration,
        }
    }

    /// The outcome, same as [`Tree::search()`](super::tree::Tree::search).
    #[must_use]
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Decisions in the order they were taken.
    #[must_use]
    pub fn path(&self) -> &[Decision] {
        &self.path
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "outcome: {}", self.outcome)?;
        write!(f, ", path: [")?;
        for (i, decision) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            let taken = if decision.matched { "match" } else { "fail" };
            write!(f, "{{{}}} {taken}", decision.want)?;
        }
        write!(f, "], duration: {:?}", self.duration)
    }
}

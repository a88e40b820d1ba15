use thiserror::Error;

/// Structural problems detected before a tree is built.
///
/// Overlapping or conflicting rules are not errors: they resolve to
/// [`Outcome::DEFAULT`](crate::Outcome::DEFAULT) at search time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("empty condition name in domain {domain}")]
    EmptyCondition { domain: usize },

    #[error("empty outcome name in domain {domain}")]
    EmptyOutcome { domain: usize },
}

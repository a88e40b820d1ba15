mod error;
mod grammar;

pub use error::ParseError;

use crate::TreeSpec;

/// Parse rule DSL text into a [`TreeSpec`].
///
/// ```text
/// # comment
/// domain (priority A, B):
///     option X: A AND B
///     option Z: A AND (D OR E)
/// domain:
///     option W: F
/// ```
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not valid DSL syntax.
pub fn parse(input: &str) -> Result<TreeSpec, ParseError> {
    use winnow::Parser;
    grammar::parse_spec
        .parse(input)
        .map_err(|e| ParseError::new(e.inner().to_string(), e.offset()))
}

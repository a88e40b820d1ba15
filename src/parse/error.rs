use std::fmt;

/// Errors produced when parsing DSL input.
///
/// `offset` is the byte position in the input where parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    offset: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// One-based line and column of [`offset`](Self::offset) within `input`.
    #[must_use]
    pub fn line_col(&self, input: &str) -> (usize, usize) {
        let before = &input[..self.offset.min(input.len())];
        let line = before.matches('\n').count() + 1;
        let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        (line, col)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ParseError::new("unexpected token", 7);
        assert_eq!(err.to_string(), "parse error at byte 7: unexpected token");
    }

    #[test]
    fn line_col_counts_from_one() {
        let input = "domain:\n    option X A";
        let err = ParseError::new("expected ':'", input.len() - 1);
        assert_eq!(err.line_col(input), (2, 14));
        assert_eq!(ParseError::new("", 0).line_col(input), (1, 1));
    }
}

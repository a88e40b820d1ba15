use thiserror::Error;

use crate::CompileError;
use crate::parse::ParseError;

/// Unified error type covering parsing, compilation, and I/O.
///
/// Returned by convenience loaders like [`Tree::from_dsl()`](crate::Tree::from_dsl)
/// and [`Tree::from_file()`](crate::Tree::from_file).
#[derive(Debug, Error)]
pub enum RuletreeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("invalid JSON rule file: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}

mod compile;
mod error;
mod search;
mod types;

pub mod parse;
pub mod render;
#[cfg(feature = "binary-cache")]
pub mod serial;

pub use error::RuletreeError;
#[cfg(feature = "binary-cache")]
pub use serial::{DeserializeError, SerializeError};
pub use types::{
    Branch, CompileError, CompileOptions, Condition, Conditions, Decision, Domain, DomainBuilder,
    Outcome, RuleOption, SearchReport, Tree, TreeBuilder, TreeSpec,
};

mod branch;
mod condition;
mod conditions;
mod domain;
mod error;
mod option;
mod search_report;
mod tree;

pub use branch::Branch;
pub use condition::{Condition, Outcome};
pub use conditions::Conditions;
pub use domain::{Domain, TreeSpec};
pub use error::CompileError;
pub use option::RuleOption;
pub use search_report::{Decision, SearchReport};
pub use tree::{CompileOptions, DomainBuilder, Tree, TreeBuilder};

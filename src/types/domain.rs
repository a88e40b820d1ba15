use super::condition::{Condition, Outcome};
use super::conditions::Conditions;
use super::option::RuleOption;

/// A group of options compiled together, with an optional pivot preference.
///
/// Conditions listed in `priority` are chosen as split points before any
/// condition that is not listed; earlier entries win over later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Domain {
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: Vec<RuleOption>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Conditions::is_empty")
    )]
    pub priority: Conditions,
}

impl Domain {
    #[must_use]
    pub fn new(options: Vec<RuleOption>) -> Self {
        Self {
            options,
            priority: Conditions::new(),
        }
    }

    #[must_use]
    pub fn with_priority<C: Into<Condition>>(mut self, priority: impl IntoIterator<Item = C>) -> Self {
        self.priority = priority.into_iter().collect();
        self
    }

    /// Every option with its alternatives flattened, in declaration order.
    #[must_use]
    pub fn expand(&self) -> Vec<RuleOption> {
        self.options.iter().flat_map(RuleOption::expand).collect()
    }

    /// Distinct conditions named by any option (`want` and `or`), first-seen order.
    #[must_use]
    pub fn conditions(&self) -> Conditions {
        self.options
            .iter()
            .flat_map(|o| o.want.iter().chain(o.or.iter()))
            .collect()
    }

    /// Distinct outcomes of the options, first-seen order.
    #[must_use]
    pub fn outcomes(&self) -> Vec<Outcome> {
        let mut outcomes: Vec<Outcome> = Vec::new();
        for option in &self.options {
            if !outcomes.contains(&option.result) {
                outcomes.push(option.result.clone());
            }
        }
        outcomes
    }
}

/// A complete rule specification: domains in the order they are consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeSpec {
    #[cfg_attr(feature = "serde", serde(default))]
    pub domains: Vec<Domain>,
}

impl TreeSpec {
    #[must_use]
    pub fn new(domains: Vec<Domain>) -> Self {
        Self { domains }
    }
}

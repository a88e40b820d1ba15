use super::condition::{Condition, Outcome};
use super::conditions::Conditions;

/// One row of a rule table: `result` is produced when every condition in
/// `want` holds, plus (when `or` is non-empty) at least one condition of `or`.
///
/// Options with alternatives are flattened by [`RuleOption::expand`] before a
/// tree is built, so compiled trees only ever see plain conjunctions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleOption {
    pub result: Outcome,
    #[cfg_attr(feature = "serde", serde(default))]
    pub want: Conditions,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Conditions::is_empty")
    )]
    pub or: Conditions,
}

impl RuleOption {
    pub fn new<C: Into<Condition>>(
        result: impl Into<Outcome>,
        want: impl IntoIterator<Item = C>,
    ) -> Self {
        Self {
            result: result.into(),
            want: want.into_iter().collect(),
            or: Conditions::new(),
        }
    }

    /// Attach alternative conditions, any one of which completes the option.
    #[must_use]
    pub fn with_alternatives<C: Into<Condition>>(mut self, or: impl IntoIterator<Item = C>) -> Self {
        self.or.extend(or);
        self
    }

    /// Flatten the `or` alternatives into one plain option per alternative.
    ///
    /// An option with `k` alternatives yields `k` options whose `want` is the
    /// original `want` plus exactly one alternative. An option without
    /// alternatives is returned unchanged.
    #[must_use]
    pub fn expand(&self) -> Vec<RuleOption> {
        if self.or.is_empty() {
            return vec![self.clone()];
        }

        self.or
            .iter()
            .map(|alternative| {
                let mut want = self.want.clone();
                want.insert(alternative.clone());
                RuleOption {
                    result: self.result.clone(),
                    want,
                    or: Conditions::new(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_without_alternatives_is_identity() {
        let option = RuleOption::new("X", ["A", "B"]);
        assert_eq!(option.expand(), vec![option]);
    }

    #[test]
    fn expand_one_option_per_alternative() {
        let option = RuleOption::new("X", ["A"]).with_alternatives(["D", "E"]);
        let expanded = option.expand();

        assert_eq!(
            expanded,
            vec![RuleOption::new("X", ["A", "D"]), RuleOption::new("X", ["A", "E"])]
        );
        assert!(expanded.iter().all(|o| o.or.is_empty()));
    }

    #[test]
    fn expand_alternatives_only() {
        let option = RuleOption::new("X", Vec::<Condition>::new()).with_alternatives(["D", "E"]);
        let expanded = option.expand();
        assert_eq!(expanded.len(), 2);
        assert_eq!(expanded[0].want, Conditions::from(["D"]));
        assert_eq!(expanded[1].want, Conditions::from(["E"]));
    }
}

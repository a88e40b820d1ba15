use super::condition::Outcome;
use super::conditions::Conditions;

/// A compiled decision tree: either a test on a set of conditions or a
/// terminal outcome.
///
/// A `Node` follows `on_match` when every condition in `want` is present in
/// the query and `on_fail` otherwise. In a compiled or deserialized tree
/// `want` is never empty; it holds more than one condition when compaction
/// merged a chain of single-condition tests. Each subtree is owned by
/// exactly one parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    Node {
        want: Conditions,
        on_match: Box<Branch>,
        on_fail: Box<Branch>,
    },
    Leaf(Outcome),
}

impl Branch {
    #[must_use]
    pub fn leaf(outcome: impl Into<Outcome>) -> Self {
        Branch::Leaf(outcome.into())
    }

    #[must_use]
    pub(crate) fn node(want: impl Into<Conditions>, on_match: Branch, on_fail: Branch) -> Self {
        let want = want.into();
        debug_assert!(!want.is_empty(), "a decision node must want something");
        Branch::Node {
            want,
            on_match: Box::new(on_match),
            on_fail: Box::new(on_fail),
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Branch::Leaf(_))
    }

    /// The tested conditions, or `None` for a leaf.
    #[must_use]
    pub fn want(&self) -> Option<&Conditions> {
        match self {
            Branch::Node { want, .. } => Some(want),
            Branch::Leaf(_) => None,
        }
    }

    /// The outcome, or `None` for a decision node.
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Branch::Leaf(outcome) => Some(outcome),
            Branch::Node { .. } => None,
        }
    }

    /// Number of decision nodes (leaves excluded).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.descendants().filter(|b| !b.is_leaf()).count()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.descendants().filter(|b| b.is_leaf()).count()
    }

    /// Number of decision nodes on the longest root-to-leaf path.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((branch, level)) = stack.pop() {
            match branch {
                Branch::Node {
                    on_match, on_fail, ..
                } => {
                    stack.push((on_match, level + 1));
                    stack.push((on_fail, level + 1));
                }
                Branch::Leaf(_) => deepest = deepest.max(level),
            }
        }
        deepest
    }

    /// Every branch of the tree, this one included, in pre-order.
    ///
    /// Walks with an explicit stack, so long fail chains do not recurse.
    pub fn descendants(&self) -> impl Iterator<Item = &Branch> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let branch = stack.pop()?;
            if let Branch::Node {
                on_match, on_fail, ..
            } = branch
            {
                stack.push(on_fail);
                stack.push(on_match);
            }
            Some(branch)
        })
    }

    /// Walk the tree for the given set of satisfied conditions.
    #[must_use]
    pub fn search(&self, conditions: &Conditions) -> &Outcome {
        crate::search::search(self, conditions)
    }
}

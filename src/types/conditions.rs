use std::fmt;

use super::condition::Condition;

/// An insertion-ordered set of [`Condition`]s.
///
/// Membership is what matters for matching; the order is kept so that
/// rendered output follows the order the rules were written in. Inserting a
/// condition that is already present is a no-op.
#[derive(Debug, Clone, Default, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<Condition>", into = "Vec<Condition>")
)]
pub struct Conditions {
    items: Vec<Condition>,
}

impl Conditions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Condition] {
        &self.items
    }

    #[must_use]
    pub fn contains<Q: AsRef<str> + ?Sized>(&self, condition: &Q) -> bool {
        let name = condition.as_ref();
        self.items.iter().any(|c| c.as_str() == name)
    }

    /// Whether every condition of `other` is present in `self`.
    #[must_use]
    pub fn contains_all(&self, other: &Conditions) -> bool {
        other.iter().all(|c| self.contains(c))
    }

    /// Index of `condition` in insertion order.
    #[must_use]
    pub fn position<Q: AsRef<str> + ?Sized>(&self, condition: &Q) -> Option<usize> {
        let name = condition.as_ref();
        self.items.iter().position(|c| c.as_str() == name)
    }

    /// Append a condition. Returns `false` if it was already present.
    pub fn insert(&mut self, condition: impl Into<Condition>) -> bool {
        let condition = condition.into();
        if self.contains(&condition) {
            return false;
        }
        self.items.push(condition);
        true
    }

    /// Remove a condition. Returns `false` if it was not present.
    pub fn remove<Q: AsRef<str> + ?Sized>(&mut self, condition: &Q) -> bool {
        match self.position(condition) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Every subset of these conditions, `2^n` in total.
    ///
    /// Subsets are produced by include/exclude recursion with the include
    /// branch first, so the full set comes first and the empty set last.
    /// The count grows exponentially; callers are expected to keep `n` small.
    #[must_use]
    pub fn combinations(&self) -> Vec<Conditions> {
        let mut out = Vec::with_capacity(1_usize << self.items.len().min(20));
        let mut current = Vec::with_capacity(self.items.len());
        combinations_recursive(&self.items, &mut current, &mut out);
        out
    }
}

fn combinations_recursive(
    remaining: &[Condition],
    current: &mut Vec<Condition>,
    out: &mut Vec<Conditions>,
) {
    let Some((first, rest)) = remaining.split_first() else {
        out.push(Conditions {
            items: current.clone(),
        });
        return;
    };

    current.push(first.clone());
    combinations_recursive(rest, current, out);
    current.pop();

    combinations_recursive(rest, current, out);
}

/// Set equality: order does not matter.
impl PartialEq for Conditions {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.contains_all(other)
    }
}

impl fmt::Display for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, condition) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}

impl<C: Into<Condition>> FromIterator<C> for Conditions {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        conditions.extend(iter);
        conditions
    }
}

impl<C: Into<Condition>> Extend<C> for Conditions {
    fn extend<I: IntoIterator<Item = C>>(&mut self, iter: I) {
        for condition in iter {
            self.insert(condition);
        }
    }
}

impl<C: Into<Condition>, const N: usize> From<[C; N]> for Conditions {
    fn from(items: [C; N]) -> Self {
        items.into_iter().collect()
    }
}

impl From<Vec<Condition>> for Conditions {
    fn from(items: Vec<Condition>) -> Self {
        items.into_iter().collect()
    }
}

impl From<Conditions> for Vec<Condition> {
    fn from(conditions: Conditions) -> Self {
        conditions.items
    }
}

impl From<Condition> for Conditions {
    fn from(condition: Condition) -> Self {
        Conditions {
            items: vec![condition],
        }
    }
}

impl IntoIterator for Conditions {
    type Item = Condition;
    type IntoIter = std::vec::IntoIter<Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Conditions {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

use std::borrow::{Borrow, Cow};
use std::fmt;

/// An atomic, named predicate. A query supplies the set of conditions that
/// currently hold; equality is exact name equality.
///
/// Conditions can be declared as constants:
///
/// ```
/// use ruletree::Condition;
///
/// const PAID: Condition = Condition::from_static("paid");
/// assert_eq!(PAID, Condition::new("paid"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct Condition(Cow<'static, str>);

impl Condition {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Condition {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Condition {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&Condition> for Condition {
    fn from(condition: &Condition) -> Self {
        condition.clone()
    }
}

impl AsRef<str> for Condition {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Condition {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// The result a rule produces. [`Outcome::DEFAULT`] is reserved for
/// "no rule matched" and for unresolved ambiguities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
pub struct Outcome(Cow<'static, str>);

impl Outcome {
    /// Returned when no rule matches the supplied conditions.
    pub const DEFAULT: Outcome = Outcome(Cow::Borrowed("DEFAULT"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Outcome {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Outcome {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl AsRef<str> for Outcome {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Outcome {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Outcome {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

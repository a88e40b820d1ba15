use std::fmt;

use super::branch::Branch;
use super::condition::{Condition, Outcome};
use super::conditions::Conditions;
use super::domain::{Domain, TreeSpec};
use super::error::CompileError;
use super::option::RuleOption;
use super::search_report::SearchReport;

/// Knobs for the compilation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Merge chained single-condition tests into multi-condition nodes.
    /// Never changes search results, only the shape of the tree.
    pub compaction: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { compaction: true }
    }
}

/// Builder for constructing a [`Tree`].
///
/// Domains are consulted in the order they are added: a later domain is only
/// reached when the earlier ones decide nothing for the query.
///
/// # Example
///
/// ```
/// use ruletree::{Conditions, TreeBuilder};
///
/// let tree = TreeBuilder::new()
///     .domain(|d| {
///         d.option("approve", ["paid", "verified"])
///             .option_any("review", ["paid"], ["flagged", "new_account"])
///     })
///     .domain(|d| d.option("reject", ["expired"]))
///     .compile()
///     .unwrap();
///
/// assert_eq!(tree.search(&Conditions::from(["verified", "paid"])), "approve");
/// assert_eq!(tree.search(&Conditions::from(["paid", "flagged"])), "review");
/// assert_eq!(tree.search(&Conditions::from(["expired"])), "reject");
/// assert!(tree.search(&Conditions::from(["paid"])).is_default());
/// ```
#[derive(Debug, Default)]
pub struct TreeBuilder {
    domains: Vec<Domain>,
    options: CompileOptions,
}

/// Intermediate builder passed to the domain definition closure.
#[derive(Debug, Default)]
pub struct DomainBuilder {
    domain: Domain,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a domain. Domains added first take precedence.
    #[must_use]
    pub fn domain(mut self, f: impl FnOnce(DomainBuilder) -> DomainBuilder) -> Self {
        let builder = f(DomainBuilder::default());
        self.domains.push(builder.domain);
        self
    }

    /// Enable or disable the compaction pass (enabled by default).
    #[must_use]
    pub fn compaction(mut self, enabled: bool) -> Self {
        self.options.compaction = enabled;
        self
    }

    /// The specification collected so far.
    #[must_use]
    pub fn spec(&self) -> TreeSpec {
        TreeSpec::new(self.domains.clone())
    }

    /// Compile the domains into an immutable `Tree`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if a condition or outcome name is empty.
    pub fn compile(self) -> Result<Tree, CompileError> {
        crate::compile::compile(&self.domains, self.options)
    }
}

impl DomainBuilder {
    /// Add an option producing `result` when every condition in `want` holds.
    #[must_use]
    pub fn option<C: Into<Condition>>(
        mut self,
        result: impl Into<Outcome>,
        want: impl IntoIterator<Item = C>,
    ) -> Self {
        self.domain.options.push(RuleOption::new(result, want));
        self
    }

    /// Add an option that additionally needs any one of `or`.
    #[must_use]
    pub fn option_any<C: Into<Condition>, A: Into<Condition>>(
        mut self,
        result: impl Into<Outcome>,
        want: impl IntoIterator<Item = C>,
        or: impl IntoIterator<Item = A>,
    ) -> Self {
        self.domain
            .options
            .push(RuleOption::new(result, want).with_alternatives(or));
        self
    }

    /// Set the pivot preference order for this domain.
    #[must_use]
    pub fn priority<C: Into<Condition>>(mut self, order: impl IntoIterator<Item = C>) -> Self {
        self.domain.priority = order.into_iter().collect();
        self
    }
}

/// A compiled, immutable decision tree. Thread-safe and designed to live
/// behind `Arc`; searching never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    pub(crate) root: Branch,
    pub(crate) conditions: Vec<Conditions>,
    pub(crate) outcomes: Vec<Vec<Outcome>>,
}

impl Tree {
    /// Compile a rule specification with default options.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if a condition or outcome name is empty.
    pub fn compile(spec: &TreeSpec) -> Result<Self, CompileError> {
        Self::compile_with(spec, CompileOptions::default())
    }

    /// Compile a rule specification with explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if a condition or outcome name is empty.
    pub fn compile_with(spec: &TreeSpec, options: CompileOptions) -> Result<Self, CompileError> {
        crate::compile::compile(&spec.domains, options)
    }

    /// Return the outcome for the given set of satisfied conditions, or
    /// [`Outcome::DEFAULT`] when no rule matches.
    #[must_use]
    pub fn search(&self, conditions: &Conditions) -> &Outcome {
        crate::search::search(&self.root, conditions)
    }

    /// Search while recording every decision taken.
    pub fn search_detailed(&self, conditions: &Conditions) -> SearchReport {
        crate::search::search_detailed(&self.root, conditions)
    }

    /// Parse a rule DSL string and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`RuletreeError`](crate::RuletreeError) on parse or compile failure.
    pub fn from_dsl(input: &str) -> Result<Self, crate::RuletreeError> {
        let spec = crate::parse::parse(input)?;
        Ok(Self::compile(&spec)?)
    }

    /// Read a rule DSL file and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`RuletreeError`](crate::RuletreeError) on I/O, parse, or compile failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::RuletreeError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input)
    }

    /// The root of the compiled tree.
    #[must_use]
    pub fn root(&self) -> &Branch {
        &self.root
    }

    /// Distinct conditions per domain, in first-seen order.
    #[must_use]
    pub fn conditions(&self) -> &[Conditions] {
        &self.conditions
    }

    /// Distinct outcomes per domain, in first-seen order.
    #[must_use]
    pub fn outcomes(&self) -> &[Vec<Outcome>] {
        &self.outcomes
    }

    #[must_use]
    pub fn domain_count(&self) -> usize {
        self.conditions.len()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Mermaid flowchart of the tree, wrapped in a Markdown code fence.
    #[must_use]
    pub fn mermaid(&self) -> crate::render::Mermaid<'_> {
        crate::render::Mermaid::new(self)
    }

    /// Markdown truth tables, one per domain.
    #[must_use]
    pub fn truth_table(&self) -> crate::render::TruthTable<'_> {
        crate::render::TruthTable::new(self)
    }
}

#[cfg(feature = "json")]
impl Tree {
    /// Parse a JSON rule file body and compile it.
    ///
    /// The format is `{"domains": [{"options": [{"result", "want", "or"}], "priority"}]}`
    /// where `or` and `priority` are optional.
    ///
    /// # Errors
    ///
    /// Returns [`RuletreeError`](crate::RuletreeError) on malformed JSON or compile failure.
    pub fn from_json(input: &str) -> Result<Self, crate::RuletreeError> {
        let spec: TreeSpec = serde_json::from_str(input)?;
        Ok(Self::compile(&spec)?)
    }

    /// Read a JSON rule file and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`RuletreeError`](crate::RuletreeError) on I/O, JSON, or compile failure.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::RuletreeError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }
}

#[cfg(feature = "binary-cache")]
impl Tree {
    /// Serialize this compiled tree to a byte vector.
    ///
    /// The optional `source_text` is hashed (BLAKE3) and embedded in the
    /// payload metadata so callers can tell when the cache is stale.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(
        &self,
        source_text: Option<&str>,
    ) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self, source_text)
    }

    /// Deserialize a tree previously produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }

    /// Serialize this tree and write it to a file.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) on
    /// encoding or I/O failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
        source_text: Option<&str>,
    ) -> Result<(), crate::serial::SerializeError> {
        let bytes = self.to_bytes(source_text)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a file and deserialize the tree it contains.
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// I/O, format, integrity, or validation failure.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::serial::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tree({} domains, {} nodes, {} leaves, depth {})",
            self.domain_count(),
            self.node_count(),
            self.leaf_count(),
            self.depth(),
        )
    }
}

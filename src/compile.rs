use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{Branch, CompileError, CompileOptions, Condition, Conditions, Domain, Outcome, RuleOption, Tree};

pub(crate) fn compile(domains: &[Domain], options: CompileOptions) -> Result<Tree, CompileError> {
    for (index, domain) in domains.iter().enumerate() {
        check_names(index, domain)?;
    }

    // Last domain first: each compiled domain becomes the fallback of the one before it.
    let root = domains
        .iter()
        .enumerate()
        .rev()
        .fold(Branch::Leaf(Outcome::DEFAULT), |fallback, (index, domain)| {
            let expanded = domain.expand();
            debug!(
                domain = index,
                options = domain.options.len(),
                expanded = expanded.len(),
                "compiling domain"
            );
            let builder = Builder::new(&fallback, &domain.priority, options);
            let branch = builder.build(expanded).branch;
            debug!(domain = index, nodes = branch.node_count(), "domain compiled");
            branch
        });

    Ok(Tree {
        root,
        conditions: domains.iter().map(Domain::conditions).collect(),
        outcomes: domains.iter().map(Domain::outcomes).collect(),
    })
}

fn check_names(index: usize, domain: &Domain) -> Result<(), CompileError> {
    for option in &domain.options {
        if option.result.as_str().is_empty() {
            return Err(CompileError::EmptyOutcome { domain: index });
        }
        if option.want.iter().chain(&option.or).any(|c| c.as_str().is_empty()) {
            return Err(CompileError::EmptyCondition { domain: index });
        }
    }
    if domain.priority.iter().any(|c| c.as_str().is_empty()) {
        return Err(CompileError::EmptyCondition { domain: index });
    }
    Ok(())
}

/// What `shrink` knows about a branch without walking it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// A copy of the domain fallback when that fallback is a decision node.
    Fallback,
    Leaf(Outcome),
    Opaque,
}

impl Kind {
    /// Two branches of these kinds are known to be identical.
    fn same_as(&self, other: &Kind) -> bool {
        *self != Kind::Opaque && self == other
    }
}

/// A branch under construction, with the kinds of itself and of its fail side.
#[derive(Debug)]
struct Built {
    branch: Branch,
    kind: Kind,
    fail: Kind,
}

impl Built {
    fn leaf(outcome: Outcome) -> Self {
        Built {
            branch: Branch::Leaf(outcome.clone()),
            kind: Kind::Leaf(outcome),
            fail: Kind::Opaque,
        }
    }

    fn node(pivot: Condition, on_match: Built, on_fail: Built) -> Self {
        Built {
            branch: Branch::node(pivot, on_match.branch, on_fail.branch),
            kind: Kind::Opaque,
            fail: on_fail.kind,
        }
    }
}

/// Builds the decision tree of one domain on top of its fallback.
struct Builder<'a> {
    fallback: &'a Branch,
    fallback_kind: Kind,
    priority: &'a Conditions,
    compaction: bool,
}

impl<'a> Builder<'a> {
    fn new(fallback: &'a Branch, priority: &'a Conditions, options: CompileOptions) -> Self {
        let fallback_kind = match fallback {
            Branch::Leaf(outcome) => Kind::Leaf(outcome.clone()),
            Branch::Node { .. } => Kind::Fallback,
        };
        Builder {
            fallback,
            fallback_kind,
            priority,
            compaction: options.compaction,
        }
    }

    /// Both sides of every split fall back to the domain fallback.
    ///
    /// The chain of fail sides is walked in a loop. Only match sides recurse,
    /// and each level of that recursion strips one condition from every
    /// option in it, so the stack depth is bounded by the longest `want`.
    fn build(&self, mut options: Vec<RuleOption>) -> Built {
        let mut splits: Vec<(Condition, Built)> = Vec::new();
        let tail = loop {
            let pivot = select_pivot(&count_occurrences(&options), self.priority);
            let Some(pivot) = pivot else {
                break self.settle(options);
            };

            let (mut matching, rest): (Vec<RuleOption>, Vec<RuleOption>) =
                options.into_iter().partition(|o| o.want.contains(&pivot));
            for option in &mut matching {
                option.want.remove(&pivot);
            }

            let on_match = self.build(matching);
            splits.push((pivot, on_match));
            options = rest;
        };

        splits
            .into_iter()
            .rev()
            .fold(tail, |on_fail, (pivot, on_match)| {
                if self.compaction {
                    shrink(pivot, on_match, on_fail)
                } else {
                    Built::node(pivot, on_match, on_fail)
                }
            })
    }

    /// Terminal case: no remaining option names any condition.
    fn settle(&self, options: Vec<RuleOption>) -> Built {
        let Some(first) = options.first() else {
            return Built {
                branch: self.fallback.clone(),
                kind: self.fallback_kind.clone(),
                fail: Kind::Opaque,
            };
        };

        if options.iter().all(|o| o.result == first.result) {
            return Built::leaf(first.result.clone());
        }

        let competing: Vec<&str> = options.iter().map(|o| o.result.as_str()).collect();
        debug!(?competing, "ambiguous options resolved to DEFAULT");
        Built::leaf(Outcome::DEFAULT)
    }
}

/// Occurrence count of every condition, in first-seen order.
fn count_occurrences(options: &[RuleOption]) -> Vec<(&Condition, usize)> {
    let mut counts: Vec<(&Condition, usize)> = Vec::new();
    let mut slots: HashMap<&Condition, usize> = HashMap::new();
    for condition in options.iter().flat_map(|o| o.want.iter()) {
        match slots.get(condition) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(condition, counts.len());
                counts.push((condition, 1));
            }
        }
    }
    counts
}

/// Pick the condition to split on.
///
/// Conditions in `priority` always outrank unlisted ones, earliest first.
/// Otherwise the most frequent condition wins; equal counts go to the
/// condition seen first.
fn select_pivot(occurrences: &[(&Condition, usize)], priority: &Conditions) -> Option<Condition> {
    let preferred = occurrences
        .iter()
        .filter_map(|&(condition, _)| priority.position(condition).map(|rank| (rank, condition)))
        .min_by_key(|&(rank, _)| rank);
    if let Some((rank, condition)) = preferred {
        trace!(%condition, rank, "pivot from priority");
        return Some(condition.clone());
    }

    let (condition, count) = occurrences
        .iter()
        .copied()
        .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })?;
    trace!(%condition, count, "pivot by occurrence");
    Some(condition.clone())
}

/// Join a split on `pivot` with its children, collapsing redundant tests.
///
/// A node whose branches are identical is replaced by that branch. When the
/// match child is itself a test whose fail branch is the same as ours, the
/// two tests only differ in what they require, so they merge into a single
/// node wanting both. Sameness is decided from the recorded kinds alone.
fn shrink(pivot: Condition, on_match: Built, on_fail: Built) -> Built {
    if on_match.kind.same_as(&on_fail.kind) {
        return on_fail;
    }

    let Built {
        branch,
        kind,
        fail: inner_fail_kind,
    } = on_match;
    match branch {
        Branch::Node {
            mut want,
            on_match: inner_match,
            on_fail: inner_fail,
        } if inner_fail_kind.same_as(&on_fail.kind) => {
            want.insert(pivot);
            Built {
                branch: Branch::Node {
                    want,
                    on_match: inner_match,
                    on_fail: inner_fail,
                },
                kind: Kind::Opaque,
                fail: inner_fail_kind,
            }
        }
        branch => Built::node(
            pivot,
            Built {
                branch,
                kind,
                fail: inner_fail_kind,
            },
            on_fail,
        ),
    }
}

//! Markdown renderings of a compiled [`Tree`].
//!
//! Both renderers are [`Display`](fmt::Display) adaptors, so they can be
//! written straight into any formatter or collected with `to_string()`.

use std::fmt;

use crate::{Branch, Tree};

const CHECK: &str = "&#10004;";
const CROSS: &str = "&#10007;";
const CENTER: &str = ":-:";

/// Mermaid `graph TD` flowchart of a tree, fenced as a Markdown code block.
///
/// Decision nodes are labelled with the conditions they want, joined by `&`;
/// leaves are rounded boxes holding the outcome.
#[derive(Debug, Clone, Copy)]
pub struct Mermaid<'t> {
    tree: &'t Tree,
}

impl<'t> Mermaid<'t> {
    #[must_use]
    pub fn new(tree: &'t Tree) -> Self {
        Self { tree }
    }
}

impl fmt::Display for Mermaid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.tree.root();
        writeln!(f, "```mermaid")?;
        writeln!(f, "graph TD")?;
        writeln!(f, "    n0{}", Shape(root))?;
        let mut next = 1;
        write_edges(f, root, 0, &mut next)?;
        writeln!(f, "```")
    }
}

fn write_edges(
    f: &mut fmt::Formatter<'_>,
    branch: &Branch,
    id: usize,
    next: &mut usize,
) -> fmt::Result {
    let Branch::Node {
        on_match, on_fail, ..
    } = branch
    else {
        return Ok(());
    };

    for (label, child) in [("Match", on_match), ("Fail", on_fail)] {
        let child_id = *next;
        *next += 1;
        writeln!(f, "    n{id} -->|{label}| n{child_id}{}", Shape(child))?;
        write_edges(f, child, child_id, next)?;
    }
    Ok(())
}

struct Shape<'b>(&'b Branch);

impl fmt::Display for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Branch::Node { want, .. } => {
                write!(f, "[\"")?;
                for (i, condition) in want.iter().enumerate() {
                    if i > 0 {
                        write!(f, " & ")?;
                    }
                    write!(f, "{condition}")?;
                }
                write!(f, "\"]")
            }
            Branch::Leaf(outcome) => write!(f, "([\"{outcome}\"])"),
        }
    }
}

/// Exhaustive truth tables, one Markdown table per domain.
///
/// Each row is one subset of the domain's conditions (see
/// [`Conditions::combinations`](crate::Conditions::combinations)); present
/// conditions get a check mark and the outcome the whole tree returns for
/// that subset gets a cross. Outcomes that belong to another domain, and
/// `DEFAULT`, leave the outcome columns blank.
#[derive(Debug, Clone, Copy)]
pub struct TruthTable<'t> {
    tree: &'t Tree,
}

impl<'t> TruthTable<'t> {
    #[must_use]
    pub fn new(tree: &'t Tree) -> Self {
        Self { tree }
    }
}

impl fmt::Display for TruthTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let domains = self.tree.conditions().iter().zip(self.tree.outcomes());
        for (index, (conditions, outcomes)) in domains.enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            if self.tree.domain_count() > 1 {
                writeln!(f, "**Domain {}**", index + 1)?;
                writeln!(f)?;
            }

            write!(f, "|")?;
            for condition in conditions {
                write!(f, " {condition} |")?;
            }
            write!(f, "   |")?;
            for outcome in outcomes {
                write!(f, " {outcome} |")?;
            }
            writeln!(f)?;

            write!(f, "|")?;
            for _ in 0..=conditions.len() + outcomes.len() {
                write!(f, "{CENTER}|")?;
            }
            writeln!(f)?;

            for row in conditions.combinations() {
                let result = self.tree.search(&row);
                write!(f, "|")?;
                for condition in conditions {
                    let mark = if row.contains(condition) { CHECK } else { " " };
                    write!(f, " {mark} |")?;
                }
                write!(f, " |")?;
                for outcome in outcomes {
                    let mark = if outcome == result { CROSS } else { " " };
                    write!(f, " {mark} |")?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::TreeBuilder;

    #[test]
    fn mermaid_single_node() {
        let tree = TreeBuilder::new()
            .domain(|d| d.option("X", ["A"]))
            .compile()
            .unwrap();
        let expected = "```mermaid\ngraph TD\n    n0[\"A\"]\n    n0 -->|Match| n1([\"X\"])\n    n0 -->|Fail| n2([\"DEFAULT\"])\n```\n";
        assert_eq!(tree.mermaid().to_string(), expected);
    }

    #[test]
    fn mermaid_merged_node_label() {
        let tree = TreeBuilder::new()
            .domain(|d| d.option("X", ["A", "B"]))
            .compile()
            .unwrap();
        assert!(tree.mermaid().to_string().contains("n0[\"B & A\"]"));
    }

    #[test]
    fn mermaid_empty_tree_is_single_leaf() {
        let tree = TreeBuilder::new().compile().unwrap();
        let rendered = tree.mermaid().to_string();
        assert!(rendered.contains("n0([\"DEFAULT\"])"));
        assert!(!rendered.contains("-->"));
    }

    #[test]
    fn truth_table_rows() {
        let tree = TreeBuilder::new()
            .domain(|d| d.option("X", ["A"]).option("Y", ["B"]))
            .compile()
            .unwrap();
        let rendered = tree.truth_table().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "| A | B |   | X | Y |");
        assert_eq!(lines[1], "|:-:|:-:|:-:|:-:|:-:|");
        assert_eq!(lines[2], "| &#10004; | &#10004; | | &#10007; |   |");
        assert_eq!(lines[3], "| &#10004; |   | | &#10007; |   |");
        assert_eq!(lines[4], "|   | &#10004; | |   | &#10007; |");
        assert_eq!(lines[5], "|   |   | |   |   |");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn truth_table_one_section_per_domain() {
        let tree = TreeBuilder::new()
            .domain(|d| d.option("X", ["A"]))
            .domain(|d| d.option("Y", ["B"]))
            .compile()
            .unwrap();
        let rendered = tree.truth_table().to_string();
        assert!(rendered.contains("**Domain 1**"));
        assert!(rendered.contains("**Domain 2**"));
        assert_eq!(rendered.matches("|:-:|:-:|:-:|").count(), 2);
    }
}


use proptest::prelude::*;
use ruletree::{Conditions, TreeBuilder};
use strategies::{arb_query, arb_spec, compile};

const KEYWORDS: &[&str] = &["and", "or", "option", "domain", "priority"];

/// Generate a DSL-safe name from a small alphabet to increase collisions.
fn arb_name() -> impl Strategy<Value = String> {
    "[a-e][a-e0-9_]{0,2}".prop_filter("keywords are reserved", |s| !KEYWORDS.contains(&s.as_str()))
}

/// Options as (result, wanted conditions) pairs over generated names.
fn arb_named_options() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
    prop::collection::vec(
        (arb_name(), prop::collection::vec(arb_name(), 1..=3)),
        1..=5,
    )
}

fn to_dsl(options: &[(String, Vec<String>)]) -> String {
    let mut text = String::from("domain:\n");
    for (result, want) in options {
        text.push_str(&format!("    option {result}: {}\n", want.join(" AND ")));
    }
    text
}

proptest! {
    /// Searching never panics, whatever the query holds.
    #[test]
    fn search_never_panics(
        options in arb_named_options(),
        query in prop::collection::vec("[a-z0-9_]{0,4}", 0..8),
    ) {
        let tree = options
            .iter()
            .fold(TreeBuilder::new(), |builder, (result, want)| {
                builder.domain(|d| d.option(result.as_str(), want.iter().map(String::as_str)))
            })
            .compile()
            .unwrap();

        let query: Conditions = query.into_iter().collect();
        let _ = tree.search(&query);
    }

    /// The detailed search reaches the same outcome as the plain one.
    #[test]
    fn detailed_agrees_with_plain(spec in arb_spec(), query in arb_query()) {
        let tree = compile(&spec);
        let report = tree.search_detailed(&query);
        prop_assert_eq!(report.outcome(), tree.search(&query));
    }

    /// Every recorded decision is consistent with the query, and the path
    /// never outgrows the tree.
    #[test]
    fn detailed_path_is_consistent(spec in arb_spec(), query in arb_query()) {
        let tree = compile(&spec);
        let report = tree.search_detailed(&query);
        prop_assert!(report.path().len() <= tree.depth());
        for decision in report.path() {
            prop_assert!(!decision.want().is_empty());
            prop_assert_eq!(decision.matched(), query.contains_all(decision.want()));
        }
    }

    /// Text written in the DSL compiles to the same tree as the builder.
    #[test]
    fn dsl_matches_builder(options in arb_named_options()) {
        let from_dsl = ruletree::Tree::from_dsl(&to_dsl(&options)).unwrap();
        let from_builder = TreeBuilder::new()
            .domain(|mut d| {
                for (result, want) in &options {
                    d = d.option(result.as_str(), want.iter().map(String::as_str));
                }
                d
            })
            .compile()
            .unwrap();
        prop_assert_eq!(from_dsl, from_builder);
    }
}

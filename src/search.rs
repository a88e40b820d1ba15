use std::time::Instant;

use crate::{Branch, Conditions, Decision, Outcome, SearchReport};

/// Walk from `branch` to a leaf. A node is matched when every condition it
/// wants is present in `conditions`.
pub(crate) fn search<'t>(branch: &'t Branch, conditions: &Conditions) -> &'t Outcome {
    let mut current = branch;
    loop {
        match current {
            Branch::Leaf(outcome) => return outcome,
            Branch::Node {
                want,
                on_match,
                on_fail,
            } => {
                current = if conditions.contains_all(want) {
                    on_match
                } else {
                    on_fail
                };
            }
        }
    }
}

pub(crate) fn search_detailed(branch: &Branch, conditions: &Conditions) -> SearchReport {
    let start = Instant::now();
    let mut path = Vec::new();
    let mut current = branch;

    let outcome = loop {
        match current {
            Branch::Leaf(outcome) => break outcome.clone(),
            Branch::Node {
                want,
                on_match,
                on_fail,
            } => {
                let matched = conditions.contains_all(want);
                path.push(Decision::new(want.clone(), matched));
                current = if matched { on_match } else { on_fail };
            }
        }
    };

    SearchReport::new(outcome, path, start.elapsed())
}

#[cfg(test)]
mod tests {
    use crate::{Conditions, TreeBuilder};

    fn spec_example() -> crate::Tree {
        TreeBuilder::new()
            .domain(|d| d.option("X", ["A", "B"]).option("Y", ["C"]))
            .compile()
            .unwrap()
    }

    #[test]
    fn search_full_match() {
        let tree = spec_example();
        assert_eq!(tree.search(&Conditions::from(["A", "B"])), "X");
        assert_eq!(tree.search(&Conditions::from(["C"])), "Y");
    }

    #[test]
    fn search_partial_match_is_default() {
        let tree = spec_example();
        assert!(tree.search(&Conditions::from(["A"])).is_default());
        assert!(tree.search(&Conditions::new()).is_default());
    }

    #[test]
    fn search_overlap_prefers_first_partition() {
        let tree = spec_example();
        assert_eq!(tree.search(&Conditions::from(["A", "B", "C"])), "X");
    }

    #[test]
    fn search_ignores_unknown_conditions() {
        let tree = spec_example();
        assert_eq!(tree.search(&Conditions::from(["Q", "C", "Z"])), "Y");
    }

    #[test]
    fn search_or_expansion() {
        let tree = TreeBuilder::new()
            .domain(|d| d.option_any("R", ["A"], ["D", "E"]))
            .compile()
            .unwrap();
        assert_eq!(tree.search(&Conditions::from(["A", "D"])), "R");
        assert_eq!(tree.search(&Conditions::from(["E", "A"])), "R");
        assert!(tree.search(&Conditions::from(["A"])).is_default());
        assert!(tree.search(&Conditions::from(["D", "E"])).is_default());
    }

    #[test]
    fn detailed_matches_plain_search() {
        let tree = spec_example();
        for query in [vec!["A", "B"], vec!["C"], vec!["A"], vec!["A", "C"], vec![]] {
            let conditions: Conditions = query.into_iter().collect();
            let report = tree.search_detailed(&conditions);
            assert_eq!(report.outcome(), tree.search(&conditions));
            assert!(report.path().len() <= tree.depth());
        }
    }

    #[test]
    fn detailed_records_path() {
        let tree = spec_example();
        let report = tree.search_detailed(&Conditions::from(["C"]));
        let taken: Vec<(String, bool)> = report
            .path()
            .iter()
            .map(|d| (d.want().to_string(), d.matched()))
            .collect();
        assert_eq!(
            taken,
            vec![("A".to_owned(), false), ("C".to_owned(), true)]
        );
    }
}

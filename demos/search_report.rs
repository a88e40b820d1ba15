use ruletree::{Conditions, TreeBuilder};

fn main() {
    let tree = TreeBuilder::new()
        .domain(|d| {
            d.option("approve", ["paid", "verified"])
                .option("hold", ["paid", "flagged"])
        })
        .domain(|d| d.option("reject", ["expired"]))
        .compile()
        .expect("failed to compile rules");

    let query = Conditions::from(["expired", "paid"]);
    let report = tree.search_detailed(&query);

    println!("{report}");
    println!();
    for decision in report.path() {
        let taken = if decision.matched() { "match" } else { "fail" };
        println!("tested {{{}}}: {taken}", decision.want());
    }
    println!("Outcome: {}", report.outcome());
    println!("Duration: {:?}", report.duration());
}

use ruletree::{Conditions, TreeBuilder};

fn main() {
    // Define rules
    let tree = TreeBuilder::new()
        .domain(|d| {
            d.option("approve", ["paid", "verified"])
                .option_any("review", ["paid"], ["flagged", "new_account"])
        })
        .domain(|d| d.option("reject", ["expired"]))
        .compile()
        .expect("failed to compile rules");

    println!("{tree}");

    // Search with the conditions that currently hold
    for query in [
        Conditions::from(["paid", "verified"]),
        Conditions::from(["paid", "new_account"]),
        Conditions::from(["expired"]),
        Conditions::from(["paid"]),
    ] {
        println!("{{{query}}} -> {}", tree.search(&query));
    }
}

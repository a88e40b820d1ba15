use ruletree::{Conditions, TreeBuilder};

fn main() {
    // Without a priority the most common condition ("paid") is tested first.
    let by_occurrence = TreeBuilder::new()
        .domain(|d| {
            d.option("approve", ["paid", "verified"])
                .option("hold", ["paid", "flagged"])
                .option("block", ["fraud"])
        })
        .compile()
        .expect("failed to compile rules");

    // Listing "fraud" first makes it the root test instead.
    let fraud_first = TreeBuilder::new()
        .domain(|d| {
            d.priority(["fraud"])
                .option("approve", ["paid", "verified"])
                .option("hold", ["paid", "flagged"])
                .option("block", ["fraud"])
        })
        .compile()
        .expect("failed to compile rules");

    println!("by occurrence:\n{}", by_occurrence.mermaid());
    println!("fraud first:\n{}", fraud_first.mermaid());

    let query = Conditions::from(["paid", "verified", "fraud"]);
    println!("{{{query}}}");
    println!("  by occurrence -> {}", by_occurrence.search(&query));
    println!("  fraud first   -> {}", fraud_first.search(&query));
}

use ruletree::{Conditions, Tree};
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=ruletree=debug shows each domain being compiled.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let tree = Tree::from_file("demos/rules.tree").expect("failed to load rules");

    println!("{tree}");

    let query = Conditions::from(["paid", "new_account"]);
    let outcome = tree.search(&query);
    if outcome.is_default() {
        println!("No rule matched.");
    } else {
        println!("Outcome: {outcome}");
    }
}

use std::sync::Arc;
use std::thread;

use ruletree::{Conditions, Tree};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let tree = Arc::new(Tree::from_file("demos/rules.tree").expect("failed to load rules"));

    let queries: Vec<Vec<&'static str>> = vec![
        vec!["paid", "verified"],
        vec!["paid", "flagged"],
        vec!["fraud", "paid", "verified"],
        vec!["unpaid", "overdue"],
        vec!["expired"],
        vec![],
    ];

    let handles: Vec<_> = queries
        .into_iter()
        .enumerate()
        .map(|(i, names)| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                let query: Conditions = names.into_iter().collect();
                let outcome = tree.search(&query).clone();
                println!("thread {i}: {{{query}}} -> {outcome}");
                outcome
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }
}

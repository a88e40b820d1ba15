use ruletree::Tree;

fn main() {
    let tree = Tree::from_dsl(
        "domain:\n    option approve: paid AND verified\n    option review: paid AND flagged\n",
    )
    .expect("failed to compile rules");

    println!("## Decision tree\n");
    println!("{}", tree.mermaid());
    println!("## Truth table\n");
    println!("{}", tree.truth_table());
}

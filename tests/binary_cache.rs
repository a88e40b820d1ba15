#![cfg(feature = "binary-cache")]

use ruletree::{Conditions, DeserializeError, Tree, TreeBuilder};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn simple_tree() -> Tree {
    TreeBuilder::new()
        .domain(|d| d.option("X", ["A", "B"]).option("Y", ["C"]))
        .compile()
        .unwrap()
}

fn complex_tree() -> Tree {
    TreeBuilder::new()
        .domain(|d| {
            d.priority(["verified"])
                .option("approve", ["paid", "verified"])
                .option_any("review", ["paid"], ["flagged", "new_account", "high_value"])
                .option("hold", ["paid", "flagged", "verified"])
        })
        .domain(|d| d.option("reject", ["expired"]).option("reject", ["chargeback"]))
        .domain(|d| d.option("archive", ["stale"]))
        .compile()
        .unwrap()
}

fn assert_same_answers(original: &Tree, restored: &Tree) {
    let mut all = Conditions::new();
    for conditions in original.conditions() {
        all.extend(conditions);
    }
    for query in all.combinations() {
        assert_eq!(original.search(&query), restored.search(&query), "query {{{query}}}");
    }
}

// ---------------------------------------------------------------------------
// Round-trips
// ---------------------------------------------------------------------------

#[test]
fn round_trip_simple() {
    let original = simple_tree();
    let bytes = original.to_bytes(None).unwrap();
    let restored = Tree::from_bytes(&bytes).unwrap();

    assert_eq!(restored, original);
    assert_eq!(restored.search(&Conditions::from(["A", "B"])), "X");
    assert!(restored.search(&Conditions::from(["A"])).is_default());
}

#[test]
fn round_trip_complex() {
    let original = complex_tree();
    let bytes = original.to_bytes(None).unwrap();
    let restored = Tree::from_bytes(&bytes).unwrap();

    assert_eq!(restored, original);
    assert_eq!(restored.conditions(), original.conditions());
    assert_eq!(restored.outcomes(), original.outcomes());
    assert_same_answers(&original, &restored);
}

#[test]
fn round_trip_empty_tree() {
    let original = TreeBuilder::new().compile().unwrap();
    let restored = Tree::from_bytes(&original.to_bytes(None).unwrap()).unwrap();
    assert_eq!(restored, original);
    assert!(restored.search(&Conditions::new()).is_default());
}

#[test]
fn round_trip_uncompacted() {
    let original = TreeBuilder::new()
        .compaction(false)
        .domain(|d| d.option("X", ["A", "B", "C"]).option("Y", ["D"]))
        .compile()
        .unwrap();
    let restored = Tree::from_bytes(&original.to_bytes(None).unwrap()).unwrap();
    assert_eq!(restored.node_count(), original.node_count());
    assert_same_answers(&original, &restored);
}

#[test]
fn round_trip_with_source_digest() {
    let source = "domain:\n    option X: A AND B\n";
    let original = Tree::from_dsl(source).unwrap();

    let bytes = original.to_bytes(Some(source)).unwrap();
    let restored = Tree::from_bytes(&bytes).unwrap();
    assert_eq!(restored, original);

    let digest = ruletree::serial::source_digest(&bytes).unwrap();
    assert_eq!(digest, Some(*blake3::hash(source.as_bytes()).as_bytes()));
}

#[test]
fn encoding_determinism() {
    let a = complex_tree().to_bytes(None).unwrap();
    let b = complex_tree().to_bytes(None).unwrap();
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Corruption
// ---------------------------------------------------------------------------

#[test]
fn corruption_byte_flip() {
    let mut corrupted = simple_tree().to_bytes(None).unwrap();
    let last = corrupted.len() - 1;
    corrupted[last] ^= 0xFF;

    let err = Tree::from_bytes(&corrupted).unwrap_err();
    assert!(
        matches!(err, DeserializeError::ChecksumMismatch),
        "expected ChecksumMismatch, got: {err}"
    );
}

#[test]
fn corruption_truncation() {
    let bytes = simple_tree().to_bytes(None).unwrap();
    let truncated = &bytes[..33];

    let err = Tree::from_bytes(truncated).unwrap_err();
    assert!(
        matches!(err, DeserializeError::LengthMismatch { .. }),
        "expected LengthMismatch, got: {err}"
    );
}

#[test]
fn bad_magic() {
    let mut bad = simple_tree().to_bytes(None).unwrap();
    bad[0..4].copy_from_slice(b"BAAD");

    let err = Tree::from_bytes(&bad).unwrap_err();
    assert!(
        matches!(err, DeserializeError::BadMagic),
        "expected BadMagic, got: {err}"
    );
}

#[test]
fn version_mismatch() {
    let mut bad = simple_tree().to_bytes(None).unwrap();
    bad[4] = 99;
    bad[5] = 0;

    let err = Tree::from_bytes(&bad).unwrap_err();
    assert!(
        matches!(
            err,
            DeserializeError::IncompatibleVersion {
                blob: 99,
                supported: 1
            }
        ),
        "expected IncompatibleVersion, got: {err}"
    );
}

#[test]
fn empty_input_rejected() {
    let err = Tree::from_bytes(&[]).unwrap_err();
    assert!(matches!(err, DeserializeError::LengthMismatch { .. }));
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

#[test]
fn file_round_trip() {
    let dir = std::env::temp_dir().join("ruletree_test_binary_cache");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("test.rtree");

    let original = complex_tree();
    original.to_binary_file(&path, None).unwrap();
    let restored = Tree::from_binary_file(&path).unwrap();
    assert_eq!(restored, original);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_file_is_io_error() {
    let err = Tree::from_binary_file("/nonexistent/ruletree.rtree").unwrap_err();
    assert!(matches!(err, DeserializeError::Io(_)));
}

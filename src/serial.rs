//! Binary serialization and deserialization of compiled trees.
//!
//! This module provides a stable binary format for persisting compiled
//! [`Tree`](crate::Tree) values. The format consists of a 32-byte fixed
//! header followed by a bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"RTRE"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! The payload stores the tree as a flat arena in post-order: both children
//! of a node appear before the node itself and the root is the last entry.
//!
//! ## Versioning
//!
//! The format version in the header must match exactly. If it does not,
//! deserialization fails immediately with [`DeserializeError::IncompatibleVersion`].
//! The engine version is informational only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Branch, Conditions, Outcome, Tree};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"RTRE";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when serializing a [`Tree`](crate::Tree) to bytes.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode tree: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when deserializing a [`Tree`](crate::Tree) from bytes.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a ruletree binary: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct SerializedTree {
    metadata: TreeMetadata,
    nodes: Vec<SerializedBranch>,
    root: usize,
    conditions: Vec<Conditions>,
    outcomes: Vec<Vec<Outcome>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TreeMetadata {
    node_count: usize,
    leaf_count: usize,
    domain_count: usize,
    source_digest: Option<[u8; 32]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum SerializedBranch {
    Node {
        want: Conditions,
        on_match: usize,
        on_fail: usize,
    },
    Leaf(Outcome),
}

// ---------------------------------------------------------------------------
// Tree -> SerializedTree
// ---------------------------------------------------------------------------

/// Append `branch` and its subtrees in post-order, returning its slot.
fn flatten(branch: &Branch, out: &mut Vec<SerializedBranch>) -> usize {
    let entry = match branch {
        Branch::Node {
            want,
            on_match,
            on_fail,
        } => {
            let on_match = flatten(on_match, out);
            let on_fail = flatten(on_fail, out);
            SerializedBranch::Node {
                want: want.clone(),
                on_match,
                on_fail,
            }
        }
        Branch::Leaf(outcome) => SerializedBranch::Leaf(outcome.clone()),
    };
    out.push(entry);
    out.len() - 1
}

fn tree_to_serialized(tree: &Tree, source_text: Option<&str>) -> SerializedTree {
    let source_digest = source_text.map(|s| *blake3::hash(s.as_bytes()).as_bytes());

    let mut nodes = Vec::with_capacity(tree.node_count() + tree.leaf_count());
    let root = flatten(&tree.root, &mut nodes);

    SerializedTree {
        metadata: TreeMetadata {
            node_count: tree.node_count(),
            leaf_count: tree.leaf_count(),
            domain_count: tree.domain_count(),
            source_digest,
        },
        nodes,
        root,
        conditions: tree.conditions.clone(),
        outcomes: tree.outcomes.clone(),
    }
}

// ---------------------------------------------------------------------------
// SerializedTree -> Tree
// ---------------------------------------------------------------------------

fn take_child(slots: &mut [Option<Branch>], index: usize) -> Result<Box<Branch>, DeserializeError> {
    slots
        .get_mut(index)
        .and_then(Option::take)
        .map(Box::new)
        .ok_or_else(|| DeserializeError::Validation(format!("node {index} is referenced twice")))
}

fn serialized_to_tree(ser: SerializedTree) -> Result<Tree, DeserializeError> {
    validate(&ser)?;

    let mut slots: Vec<Option<Branch>> = Vec::with_capacity(ser.nodes.len());
    for entry in ser.nodes {
        let branch = match entry {
            SerializedBranch::Node {
                want,
                on_match,
                on_fail,
            } => Branch::Node {
                want,
                on_match: take_child(&mut slots, on_match)?,
                on_fail: take_child(&mut slots, on_fail)?,
            },
            SerializedBranch::Leaf(outcome) => Branch::Leaf(outcome),
        };
        slots.push(Some(branch));
    }

    let root = slots
        .pop()
        .flatten()
        .ok_or_else(|| DeserializeError::Validation("missing root".to_owned()))?;
    if let Some(orphan) = slots.iter().position(Option::is_some) {
        return Err(DeserializeError::Validation(format!(
            "node {orphan} is not reachable from the root"
        )));
    }

    Ok(Tree {
        root,
        conditions: ser.conditions,
        outcomes: ser.outcomes,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(ser: &SerializedTree) -> Result<(), DeserializeError> {
    let node_count = ser
        .nodes
        .iter()
        .filter(|n| matches!(n, SerializedBranch::Node { .. }))
        .count();
    let leaf_count = ser.nodes.len() - node_count;

    // Metadata consistency
    if ser.metadata.node_count != node_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} nodes but payload has {}",
            ser.metadata.node_count, node_count
        )));
    }
    if ser.metadata.leaf_count != leaf_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} leaves but payload has {}",
            ser.metadata.leaf_count, leaf_count
        )));
    }
    if ser.metadata.domain_count != ser.conditions.len()
        || ser.metadata.domain_count != ser.outcomes.len()
    {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} domains but payload has {} condition sets and {} outcome sets",
            ser.metadata.domain_count,
            ser.conditions.len(),
            ser.outcomes.len()
        )));
    }

    // Root is the last post-order entry
    if ser.nodes.is_empty() || ser.root != ser.nodes.len() - 1 {
        return Err(DeserializeError::Validation(format!(
            "root index {} does not close a tree of {} entries",
            ser.root,
            ser.nodes.len()
        )));
    }

    for (index, entry) in ser.nodes.iter().enumerate() {
        validate_branch(entry, index)?;
    }

    Ok(())
}

fn validate_branch(entry: &SerializedBranch, index: usize) -> Result<(), DeserializeError> {
    match entry {
        SerializedBranch::Leaf(outcome) => {
            if outcome.as_str().is_empty() {
                return Err(DeserializeError::Validation(format!(
                    "leaf {index} has an empty outcome"
                )));
            }
            Ok(())
        }
        SerializedBranch::Node {
            want,
            on_match,
            on_fail,
        } => {
            if want.is_empty() {
                return Err(DeserializeError::Validation(format!(
                    "node {index} tests no conditions"
                )));
            }
            for child in [on_match, on_fail] {
                if *child >= index {
                    return Err(DeserializeError::Validation(format!(
                        "node {index} references {child}, violating post-order"
                    )));
                }
            }
            if on_match == on_fail {
                return Err(DeserializeError::Validation(format!(
                    "node {index} uses {on_match} for both branches"
                )));
            }
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);
    let hash_bytes = hash.as_bytes();

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    #[allow(clippy::cast_possible_truncation)] // payload will never exceed 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash_bytes[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    // bytes[6..8] is engine_version, bytes[8..12] is flags
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

pub(crate) fn encode(tree: &Tree, source_text: Option<&str>) -> Result<Vec<u8>, SerializeError> {
    let serialized = tree_to_serialized(tree, source_text);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    Ok(buf)
}

/// Check the header and checksum, then decode the payload.
fn open(bytes: &[u8]) -> Result<SerializedTree, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_end = HEADER_SIZE + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[HEADER_SIZE..payload_end];

    let computed_hash = blake3::hash(payload);
    if computed_hash.as_bytes()[..16] != stored_hash {
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedTree, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;
    Ok(serialized)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<Tree, DeserializeError> {
    serialized_to_tree(open(bytes)?)
}

/// BLAKE3 digest of the source text a blob was built from, if one was recorded.
///
/// Compare it against `blake3::hash(current_source)` to decide whether a
/// cached tree is stale.
///
/// # Errors
///
/// Returns [`DeserializeError`] on format or integrity failure.
pub fn source_digest(bytes: &[u8]) -> Result<Option<[u8; 32]>, DeserializeError> {
    Ok(open(bytes)?.metadata.source_digest)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

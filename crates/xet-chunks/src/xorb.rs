//! Xorb hash: the root of a content-defined tree over an ordered chunk list
//!
//! Each pass groups consecutive nodes into parents of 2 to 9 children and
//! hashes every group; passes repeat until one node remains. Where a group
//! ends is decided by the children's own hashes, the same trick the chunker
//! uses one level down, so the tree shape is a function of the content and
//! re-verifying one changed chunk costs O(depth) node hashes.
//!
//! A parent is `keyed_hash(NODE_KEY, hash_0 || len_0 || hash_1 || len_1 ...)`
//! with every length as 8 bytes little-endian; its length is the sum of its
//! children's lengths.
//!
//! The grouping rule is compatibility-critical. Stored xorbs are addressed
//! by this hash, so the rule must stay bit-exact, including the fact that
//! the child counter is reset to zero (not one) after a group closes.

use tracing::debug;
use xet_core::{Chunk, MerkleHash};

use crate::hash::NODE_KEY;

/// Expected children per node
pub const MEAN_CHUNK_PER_NODE: usize = 4;

/// Byte 24 is the low byte of the fourth little-endian word of a hash.
const GROUPING_BYTE: usize = 3 * 8;

/// A hash paired with the byte length it covers
pub type Node = (MerkleHash, u64);

/// Xorb hash of an ordered chunk list. An empty list hashes to all zeros.
pub fn xorb_hash(chunks: &[Chunk]) -> MerkleHash {
    let nodes: Vec<Node> = chunks.iter().map(|c| (c.hash, c.length)).collect();
    xorb_hash_from_pairs(&nodes)
}

/// Xorb hash over `(hash, length)` pairs.
pub fn xorb_hash_from_pairs(chunks: &[Node]) -> MerkleHash {
    if chunks.is_empty() {
        return MerkleHash::default();
    }

    let mut level = chunks.to_vec();
    let mut depth = 0usize;
    while level.len() > 1 {
        level = collapse_level(&level);
        depth += 1;
    }

    debug!(chunks = chunks.len(), depth, "xorb hash computed");
    level[0].0
}

/// One grouping pass: the parents of `nodes`, in order.
pub fn collapse_level(nodes: &[Node]) -> Vec<Node> {
    let mut parents = Vec::with_capacity(nodes.len() / MEAN_CHUNK_PER_NODE + 1);
    let mut start = 0;
    let mut children = 0;

    for (i, (hash, _)) in nodes.iter().enumerate() {
        let is_last = i == nodes.len() - 1;
        let is_full = children == 2 * MEAN_CHUNK_PER_NODE;
        let is_cut = children >= 2
            && hash.as_bytes()[GROUPING_BYTE] as usize % MEAN_CHUNK_PER_NODE == 0;

        if is_last || is_full || is_cut {
            parents.push(node_hash(&nodes[start..=i]));
            start = i + 1;
            children = 0;
        } else {
            children += 1;
        }
    }

    parents
}

/// Hash a group of children into their parent node.
pub fn node_hash(children: &[Node]) -> Node {
    let mut hasher = blake3::Hasher::new_keyed(&NODE_KEY);
    let mut length = 0u64;
    for (hash, len) in children {
        hasher.update(hash.as_bytes());
        hasher.update(&len.to_le_bytes());
        length += len;
    }
    (MerkleHash::from_bytes(*hasher.finalize().as_bytes()), length)
}

//! Keyed BLAKE3 hashing with the fixed domain keys
//!
//! Every digest the engine produces is a BLAKE3 keyed hash. The key selects
//! the domain: chunk contents, aggregation nodes, and verification ranges
//! each get their own key, so a digest from one domain can never be
//! replayed as a digest in another.

use xet_core::{MerkleHash, HASH_LEN};

/// Key for hashing raw chunk bytes
pub const DATA_KEY: [u8; HASH_LEN] = [
    102, 151, 245, 119, 91, 149, 80, 222, 49, 53, 203, 172, 165, 151, 24, 28, 157, 228, 33, 16,
    155, 235, 43, 88, 180, 208, 176, 75, 147, 173, 242, 41,
];

/// Key for hashing aggregation nodes (see `xorb`)
pub const NODE_KEY: [u8; HASH_LEN] = [
    1, 126, 197, 199, 165, 71, 41, 150, 253, 148, 102, 102, 180, 138, 2, 230, 93, 221, 83, 111,
    55, 199, 109, 210, 248, 99, 82, 230, 74, 83, 113, 63,
];

/// Key for range verification hashes (see `verification`)
pub const VERIFICATION_KEY: [u8; HASH_LEN] = [
    127, 24, 87, 214, 206, 86, 237, 102, 18, 127, 249, 19, 231, 165, 195, 243, 164, 205, 38, 213,
    181, 219, 73, 230, 65, 36, 152, 127, 40, 251, 148, 195,
];

/// BLAKE3 keyed hash of `data` under `key`.
pub fn keyed_hash(key: &[u8; HASH_LEN], data: &[u8]) -> MerkleHash {
    MerkleHash::from_bytes(*blake3::keyed_hash(key, data).as_bytes())
}

/// Content hash of one chunk's bytes.
pub fn chunk_hash(data: &[u8]) -> MerkleHash {
    keyed_hash(&DATA_KEY, data)
}

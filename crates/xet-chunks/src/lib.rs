//! xet-chunks: content-defined chunking and xorb hashing
//!
//! # Overview
//! - `gear`: rolling hash boundary detection
//! - `chunker`: streaming chunker with min/max size policy
//! - `hash`: BLAKE3 keyed hashing with the fixed data/node/verification keys
//! - `xorb`: aggregation of an ordered chunk list into one root hash
//! - `verification`: file hashes, range verification hashes, HMAC
//! - `parallel`: rayon fan-out across independent streams and xorbs
//!
//! Pipeline: bytes → `Chunker` → `[Chunk]` → `xorb_hash` / `file_hash`

pub mod chunker;
pub mod gear;
pub mod hash;
pub mod parallel;
#[doc(hidden)]
pub mod testdata;
pub mod verification;
pub mod xorb;

// Convenience re-exports for the most common operations
pub use chunker::{chunk_data, Chunker};
pub use hash::{chunk_hash, keyed_hash};
pub use parallel::{build_pool, chunk_streams, xorb_hashes};
pub use verification::{file_hash, file_hash_with_salt, hmac, hmac_hex, verification_hash};
pub use xet_core::{Chunk, MerkleHash, XetError, XetResult};
pub use xorb::{xorb_hash, xorb_hash_from_pairs};

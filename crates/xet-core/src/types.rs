use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{XetError, XetResult};

/// Size of every digest in the system (chunk, node, xorb, file hashes)
pub const HASH_LEN: usize = 32;

/// A 32-byte digest.
///
/// The text form treats the bytes as four little-endian `u64` words and
/// prints each word as 16 lowercase hex digits, in word order. This is not
/// the same as hex-encoding the raw bytes.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MerkleHash([u8; HASH_LEN]);

impl MerkleHash {
    pub const fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// True for the all-zero hash (the xorb hash of an empty chunk list)
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// The `index`-th little-endian 64-bit word (0..4)
    pub fn word(&self, index: usize) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.0[index * 8..index * 8 + 8]);
        u64::from_le_bytes(word)
    }

    /// Format as 64 lowercase hex characters, word by word
    pub fn to_hex(&self) -> String {
        (0..HASH_LEN / 8)
            .map(|i| format!("{:016x}", self.word(i)))
            .collect()
    }

    /// Parse the output of [`MerkleHash::to_hex`].
    pub fn from_hex(hex: &str) -> XetResult<Self> {
        if hex.len() != HASH_LEN * 2 {
            return Err(XetError::InvalidHex(format!(
                "expected {} characters, got {}",
                HASH_LEN * 2,
                hex.len()
            )));
        }
        // from_str_radix tolerates a leading '+', so reject anything non-hex up front
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(XetError::InvalidHex(format!("non-hex character in '{hex}'")));
        }

        let mut bytes = [0u8; HASH_LEN];
        for (i, word) in bytes.chunks_exact_mut(8).enumerate() {
            let digits = &hex[i * 16..(i + 1) * 16];
            let value = u64::from_str_radix(digits, 16)
                .map_err(|e| XetError::InvalidHex(format!("'{digits}': {e}")))?;
            word.copy_from_slice(&value.to_le_bytes());
        }
        Ok(Self(bytes))
    }
}

impl From<[u8; HASH_LEN]> for MerkleHash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for MerkleHash {
    type Error = XetError;

    fn try_from(bytes: &[u8]) -> XetResult<Self> {
        let bytes: [u8; HASH_LEN] = bytes
            .try_into()
            .map_err(|_| XetError::InvalidHashLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for MerkleHash {
    type Error = XetError;

    fn try_from(hex: String) -> XetResult<Self> {
        Self::from_hex(&hex)
    }
}

impl From<MerkleHash> for String {
    fn from(hash: MerkleHash) -> Self {
        hash.to_hex()
    }
}

impl fmt::Display for MerkleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for MerkleHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MerkleHash({})", self.to_hex())
    }
}

/// A content-defined chunk, as emitted by the chunker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Keyed BLAKE3 hash of the chunk bytes
    pub hash: MerkleHash,
    /// Chunk length in bytes
    pub length: u64,
    /// Set by callers that already know this chunk; never computed here
    #[serde(default, skip_serializing_if = "is_false")]
    pub dedup: bool,
}

impl Chunk {
    pub fn new(hash: MerkleHash, length: u64) -> Self {
        Self {
            hash,
            length,
            dedup: false,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

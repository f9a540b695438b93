//! File hashes, range verification hashes, and HMAC
//!
//! These digests are computed over the ordered chunk sequence of a whole
//! file, which may be spread over several xorbs. None of them depends on how
//! the chunks were packed into xorbs.

use xet_core::{Chunk, MerkleHash, XetResult};

use crate::hash::{keyed_hash, VERIFICATION_KEY};
use crate::xorb::{xorb_hash, xorb_hash_from_pairs, Node};

/// Verification hash of a run of chunk hashes: one keyed hash over the
/// concatenated raw digests.
pub fn verification_hash(chunk_hashes: &[MerkleHash]) -> MerkleHash {
    let mut hasher = blake3::Hasher::new_keyed(&VERIFICATION_KEY);
    for hash in chunk_hashes {
        hasher.update(hash.as_bytes());
    }
    MerkleHash::from_bytes(*hasher.finalize().as_bytes())
}

/// File hash with the default (all-zero) salt.
pub fn file_hash(chunks: &[Chunk]) -> MerkleHash {
    file_hash_with_salt(chunks, &MerkleHash::default())
}

/// File hash: the aggregated chunk tree root, HMAC'd with `salt`.
///
/// A file with no chunks hashes to all zeros.
pub fn file_hash_with_salt(chunks: &[Chunk], salt: &MerkleHash) -> MerkleHash {
    if chunks.is_empty() {
        return MerkleHash::default();
    }
    hmac(&xorb_hash(chunks), salt)
}

/// [`file_hash_with_salt`] over `(hash, length)` pairs.
pub fn file_hash_from_pairs(chunks: &[Node], salt: &MerkleHash) -> MerkleHash {
    if chunks.is_empty() {
        return MerkleHash::default();
    }
    hmac(&xorb_hash_from_pairs(chunks), salt)
}

/// Access-scoped variant of `hash`: `keyed_hash(key, hash)`.
pub fn hmac(hash: &MerkleHash, key: &MerkleHash) -> MerkleHash {
    keyed_hash(key.as_bytes(), hash.as_bytes())
}

/// [`hmac`] over hex strings, in and out.
pub fn hmac_hex(hash_hex: &str, key_hex: &str) -> XetResult<String> {
    let hash = MerkleHash::from_hex(hash_hex)?;
    let key = MerkleHash::from_hex(key_hex)?;
    Ok(hmac(&hash, &key).to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::chunk_hash;
    use xet_core::config::VerificationConfig;
    use xet_core::XetError;

    fn chunks(n: u64) -> Vec<Chunk> {
        (0..n)
            .map(|i| Chunk::new(chunk_hash(&i.to_be_bytes()), 4096 + i))
            .collect()
    }

    fn hashes(chunks: &[Chunk]) -> Vec<MerkleHash> {
        chunks.iter().map(|c| c.hash).collect()
    }

    #[test]
    fn verification_hash_layout() {
        let list = hashes(&chunks(3));
        let mut buf = Vec::new();
        for h in &list {
            buf.extend_from_slice(h.as_bytes());
        }
        assert_eq!(verification_hash(&list), keyed_hash(&VERIFICATION_KEY, &buf));
    }

    #[test]
    fn verification_hash_depends_only_on_hash_sequence() {
        let a = chunks(6);
        let mut b = a.clone();
        for c in &mut b {
            c.length *= 2;
        }
        assert_eq!(verification_hash(&hashes(&a)), verification_hash(&hashes(&b)));

        let mut reordered = hashes(&a);
        reordered.swap(0, 5);
        assert_ne!(verification_hash(&hashes(&a)), verification_hash(&reordered));
    }

    #[test]
    fn file_hash_of_empty_file_is_zero() {
        assert!(file_hash(&[]).is_zero());
        assert!(file_hash_from_pairs(&[], &MerkleHash::default()).is_zero());
    }

    #[test]
    fn file_hash_is_salted_xorb_root() {
        let list = chunks(20);
        let root = xorb_hash(&list);
        assert_eq!(file_hash(&list), hmac(&root, &MerkleHash::default()));
        assert_ne!(file_hash(&list), root);

        let salt = chunk_hash(b"salt");
        assert_ne!(file_hash_with_salt(&list, &salt), file_hash(&list));
    }

    #[test]
    fn default_config_salt_is_zero_salt() {
        let list = chunks(5);
        let salt = VerificationConfig::default().salt();
        assert_eq!(file_hash_with_salt(&list, &salt), file_hash(&list));
    }

    #[test]
    fn file_hash_independent_of_xorb_packing() {
        // The same chunk sequence, whether it came from one xorb or two
        let list = chunks(30);
        let (first, second) = list.split_at(13);
        let rejoined: Vec<Chunk> = first.iter().chain(second).copied().collect();
        assert_eq!(file_hash(&list), file_hash(&rejoined));

        let pairs: Vec<Node> = list.iter().map(|c| (c.hash, c.length)).collect();
        assert_eq!(
            file_hash(&list),
            file_hash_from_pairs(&pairs, &MerkleHash::default())
        );
    }

    #[test]
    fn hmac_hex_matches_typed_hmac() {
        let hash = chunk_hash(b"content");
        let key = chunk_hash(b"key");
        let out = hmac_hex(&hash.to_hex(), &key.to_hex()).unwrap();
        assert_eq!(out.len(), 64);
        assert_eq!(out, hmac(&hash, &key).to_hex());
        assert_ne!(out, hash.to_hex());
    }

    #[test]
    fn hmac_depends_on_key() {
        let hash = chunk_hash(b"content");
        assert_ne!(
            hmac(&hash, &chunk_hash(b"k1")),
            hmac(&hash, &chunk_hash(b"k2"))
        );
    }

    #[test]
    fn hmac_hex_rejects_malformed_input() {
        let good = chunk_hash(b"x").to_hex();
        assert!(matches!(
            hmac_hex("zz", &good),
            Err(XetError::InvalidHex(_))
        ));
        assert!(hmac_hex(&good, &good[..63]).is_err());
    }
}

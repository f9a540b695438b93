//! Gear rolling hash boundary detection
//!
//! Each byte shifts the 64-bit accumulator left by one and adds a
//! pseudo-random constant from a 256-entry lookup table. A boundary is found
//! where `hash & mask == 0`. Because a bit shifted out after 64 steps is
//! gone, the accumulator only depends on the last 64 bytes seen.
//!
//! Scanning is resumable: pass the returned hash back in as `hash0` and the
//! result does not depend on how the stream was split across calls.

pub use gearhash::{Table, DEFAULT_TABLE};

/// Result of scanning one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    /// Offset just past the byte that produced a match, if any
    pub position: Option<usize>,
    /// Accumulator after the last byte processed
    pub hash: u64,
}

/// Roll `hash` forward by one byte.
#[inline(always)]
pub fn roll(hash: u64, byte: u8, table: &Table) -> u64 {
    (hash << 1).wrapping_add(table[byte as usize])
}

/// Scan `buf` for the first position where `hash & mask == 0`.
///
/// Stops at the first match. When the buffer is exhausted without a match,
/// `position` is `None` and `hash` is the accumulator to resume from.
pub fn next_match(buf: &[u8], mask: u64, hash0: u64, table: &Table) -> MatchResult {
    let mut hash = hash0;
    for (i, &b) in buf.iter().enumerate() {
        hash = roll(hash, b, table);
        if hash & mask == 0 {
            return MatchResult {
                position: Some(i + 1),
                hash,
            };
        }
    }
    MatchResult {
        position: None,
        hash,
    }
}

/// Every boundary in one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matches {
    /// Absolute boundary offsets into the scanned buffer, ascending
    pub boundaries: Vec<usize>,
    /// Accumulator after the trailing unmatched bytes
    pub hash: u64,
    /// Bytes after the last boundary
    pub remaining: usize,
}

/// Find all boundaries in `buf`, restarting the accumulator at 0 after each one.
///
/// No minimum or maximum length is applied; see `chunker` for that.
pub fn next_matches(buf: &[u8], mask: u64, hash0: u64, table: &Table) -> Matches {
    let mut boundaries = Vec::new();
    let mut offset = 0;
    let mut result = next_match(buf, mask, hash0, table);

    while let Some(position) = result.position {
        offset += position;
        boundaries.push(offset);
        result = next_match(&buf[offset..], mask, 0, table);
    }

    Matches {
        boundaries,
        hash: result.hash,
        remaining: buf.len() - offset,
    }
}

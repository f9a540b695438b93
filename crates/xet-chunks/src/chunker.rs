//! Streaming content-defined chunker
//!
//! Splits a byte stream into chunks whose boundaries are chosen by the gear
//! rolling hash, so that an edit only disturbs the chunks around it. The
//! stream can be delivered in arbitrary pieces: boundaries and hashes are a
//! function of the cumulative bytes only, never of how `feed` was called.
//!
//! Size policy for a target `T` (a power of two):
//!   - minimum chunk `T / 8`: the first `T / 8 - 64 - 1` bytes of each chunk
//!     are copied without being scanned
//!   - maximum chunk `2 * T`: a chunk is cut here even without a boundary
//!   - mask: `T - 1` shifted so its top bit is bit 63

use tracing::{debug, trace};
use xet_core::config::{ChunkingConfig, DEFAULT_TARGET_CHUNK_SIZE};
use xet_core::{Chunk, XetError, XetResult};

use crate::gear::{self, Table, DEFAULT_TABLE};
use crate::hash::chunk_hash;

/// Bytes the gear hash effectively covers
pub const HASH_WINDOW_SIZE: usize = 64;

pub const MINIMUM_CHUNK_DIVISOR: usize = 8;

pub const MAXIMUM_CHUNK_MULTIPLIER: usize = 2;

/// Per-stream chunking state.
///
/// One chunker handles exactly one stream; [`Chunker::finish`] consumes it.
pub struct Chunker {
    minimum_chunk: usize,
    maximum_chunk: usize,
    mask: u64,
    table: &'static Table,
    /// Fixed-capacity accumulation buffer, `maximum_chunk` bytes
    chunk_buf: Box<[u8]>,
    cur_chunk_len: usize,
    hash: u64,
}

impl Chunker {
    /// Create a chunker for `target_chunk_size`.
    ///
    /// Fails if the target is not a power of two, is not larger than
    /// [`HASH_WINDOW_SIZE`], or is too large to size the buffer.
    pub fn new(target_chunk_size: usize) -> XetResult<Self> {
        validate_target_chunk_size(target_chunk_size)?;
        Ok(Self::build(target_chunk_size))
    }

    /// Construct for an already-validated target.
    fn build(target_chunk_size: usize) -> Self {
        let minimum_chunk = target_chunk_size / MINIMUM_CHUNK_DIVISOR;
        let maximum_chunk = target_chunk_size * MAXIMUM_CHUNK_MULTIPLIER;
        let mask = target_mask(target_chunk_size);

        debug!(
            target_chunk_size,
            minimum_chunk,
            maximum_chunk,
            mask = %format!("{mask:#018x}"),
            "chunker created"
        );

        Self {
            minimum_chunk,
            maximum_chunk,
            mask,
            table: &DEFAULT_TABLE,
            chunk_buf: vec![0u8; maximum_chunk].into_boxed_slice(),
            cur_chunk_len: 0,
            hash: 0,
        }
    }

    /// Create a chunker from the `[chunking]` config table.
    pub fn from_config(config: &ChunkingConfig) -> XetResult<Self> {
        Self::new(config.target_chunk_size)
    }

    pub fn minimum_chunk(&self) -> usize {
        self.minimum_chunk
    }

    pub fn maximum_chunk(&self) -> usize {
        self.maximum_chunk
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    /// Bytes buffered for the chunk in progress
    pub fn pending_len(&self) -> usize {
        self.cur_chunk_len
    }

    /// Process a prefix of `data`, emitting at most one chunk.
    ///
    /// Returns the chunk (if one was completed) and the number of bytes of
    /// `data` consumed. Callers loop, advancing by the consumed count, until
    /// the input is exhausted; [`Chunker::feed`] does exactly that.
    pub fn next(&mut self, data: &[u8], is_final: bool) -> (Option<Chunk>, usize) {
        let n_bytes = data.len();
        let mut create_chunk = false;
        let mut consume_len = 0;

        if n_bytes != 0 {
            // The minimum-size region is copied without scanning
            if self.cur_chunk_len + HASH_WINDOW_SIZE < self.minimum_chunk {
                let skip = self.minimum_chunk - self.cur_chunk_len - HASH_WINDOW_SIZE - 1;
                let max_advance = skip.min(n_bytes - consume_len);
                consume_len += max_advance;
                self.cur_chunk_len += max_advance;
            }

            let read_end = n_bytes.min(consume_len + self.maximum_chunk - self.cur_chunk_len);

            let window = &data[consume_len..read_end];
            let result = gear::next_match(window, self.mask, self.hash, self.table);
            self.hash = result.hash;
            let mut bytes_to_next_boundary = match result.position {
                Some(position) => {
                    create_chunk = true;
                    position
                }
                None => read_end - consume_len,
            };

            if bytes_to_next_boundary + self.cur_chunk_len >= self.maximum_chunk {
                bytes_to_next_boundary = self.maximum_chunk - self.cur_chunk_len;
                create_chunk = true;
            }

            self.cur_chunk_len += bytes_to_next_boundary;
            consume_len += bytes_to_next_boundary;

            // Everything consumed in this call, skipped prefix included
            let start = self.cur_chunk_len - consume_len;
            self.chunk_buf[start..self.cur_chunk_len].copy_from_slice(&data[..consume_len]);
        }

        let end_of_input = consume_len == n_bytes;
        if create_chunk || (is_final && end_of_input && self.cur_chunk_len > 0) {
            let chunk = self.emit();
            return (Some(chunk), consume_len);
        }

        (None, consume_len)
    }

    /// Feed the next piece of the stream, returning every chunk it completes.
    ///
    /// With `is_final` set, a trailing partial chunk is flushed as well.
    pub fn feed(&mut self, data: &[u8], is_final: bool) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut pos = 0;

        loop {
            let (chunk, consumed) = self.next(&data[pos..], is_final);
            chunks.extend(chunk);
            pos += consumed;
            if pos >= data.len() {
                break;
            }
        }

        chunks
    }

    /// Flush the buffered partial chunk, if any, and end the stream.
    pub fn finish(mut self) -> Option<Chunk> {
        self.next(&[], true).0
    }

    fn emit(&mut self) -> Chunk {
        let data = &self.chunk_buf[..self.cur_chunk_len];
        let chunk = Chunk::new(chunk_hash(data), self.cur_chunk_len as u64);
        trace!(length = chunk.length, hash = %chunk.hash, "chunk emitted");
        self.cur_chunk_len = 0;
        self.hash = 0;
        chunk
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::build(DEFAULT_TARGET_CHUNK_SIZE)
    }
}

impl std::fmt::Debug for Chunker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunker")
            .field("minimum_chunk", &self.minimum_chunk)
            .field("maximum_chunk", &self.maximum_chunk)
            .field("mask", &format_args!("{:#018x}", self.mask))
            .field("cur_chunk_len", &self.cur_chunk_len)
            .finish()
    }
}

/// Check a target chunk size without allocating a chunker.
pub fn validate_target_chunk_size(target_chunk_size: usize) -> XetResult<()> {
    if !target_chunk_size.is_power_of_two() {
        return Err(XetError::TargetNotPowerOfTwo(target_chunk_size));
    }
    if target_chunk_size <= HASH_WINDOW_SIZE {
        return Err(XetError::TargetTooSmall {
            size: target_chunk_size,
            window: HASH_WINDOW_SIZE,
        });
    }
    if target_chunk_size as u64 >= u32::MAX as u64
        || target_chunk_size
            .checked_mul(MAXIMUM_CHUNK_MULTIPLIER)
            .is_none()
    {
        return Err(XetError::TargetTooLarge(target_chunk_size));
    }
    Ok(())
}

/// Boundary mask for a power-of-two target: `target - 1`, shifted so its
/// most significant set bit is bit 63.
pub fn target_mask(target_chunk_size: usize) -> u64 {
    let mask = target_chunk_size.saturating_sub(1) as u64;
    mask.checked_shl(mask.leading_zeros()).unwrap_or(0)
}

/// Chunk a complete in-memory buffer.
///
/// Returns a list of chunks. For empty data, returns an empty list.
pub fn chunk_data(data: &[u8], target_chunk_size: usize) -> XetResult<Vec<Chunk>> {
    let mut chunker = Chunker::new(target_chunk_size)?;
    Ok(chunker.feed(data, true))
}

//! Fan-out over independent streams and xorbs
//!
//! Chunking one stream is strictly sequential (the rolling hash carries
//! across every byte), but separate streams share nothing, so they run on a
//! rayon pool. Results come back in input order.

use anyhow::Context;
use rayon::prelude::*;
use tracing::debug;
use xet_core::config::ParallelConfig;
use xet_core::{Chunk, MerkleHash, XetResult};

use crate::chunker::{validate_target_chunk_size, Chunker};
use crate::xorb::xorb_hash;

/// Build a rayon pool sized by `config.workers` (0 = one per CPU).
pub fn build_pool(config: &ParallelConfig) -> XetResult<rayon::ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|i| format!("xet-chunk-{i}"))
        .build()
        .context("building chunking thread pool")?;
    debug!(threads = pool.current_num_threads(), "chunking pool ready");
    Ok(pool)
}

/// Chunk each buffer as its own complete stream.
///
/// The target size is validated once, before any work starts.
pub fn chunk_streams(
    pool: &rayon::ThreadPool,
    streams: &[&[u8]],
    target_chunk_size: usize,
) -> XetResult<Vec<Vec<Chunk>>> {
    validate_target_chunk_size(target_chunk_size)?;

    let results = pool.install(|| {
        streams
            .par_iter()
            .map(|data| {
                let mut chunker = Chunker::new(target_chunk_size)?;
                Ok(chunker.feed(data, true))
            })
            .collect::<XetResult<Vec<_>>>()
    })?;

    debug!(streams = streams.len(), "streams chunked");
    Ok(results)
}

/// Xorb hash of each chunk list.
pub fn xorb_hashes(pool: &rayon::ThreadPool, xorbs: &[Vec<Chunk>]) -> Vec<MerkleHash> {
    pool.install(|| xorbs.par_iter().map(|chunks| xorb_hash(chunks)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::chunk_data;
    use xet_core::XetError;

    fn pool(workers: usize) -> rayon::ThreadPool {
        build_pool(&ParallelConfig { workers }).unwrap()
    }

    fn stream(seed: u8, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| (i as u32).wrapping_mul(0x9E37_79B9).rotate_left(seed as u32) as u8 ^ seed)
            .collect()
    }

    #[test]
    fn pool_honors_worker_count() {
        assert_eq!(pool(3).current_num_threads(), 3);
        assert!(pool(0).current_num_threads() >= 1);
    }

    #[test]
    fn parallel_matches_sequential() {
        let data: Vec<Vec<u8>> = (0..6).map(|s| stream(s, 20_000 + s as usize * 777)).collect();
        let streams: Vec<&[u8]> = data.iter().map(Vec::as_slice).collect();

        let parallel = chunk_streams(&pool(4), &streams, 1024).unwrap();
        assert_eq!(parallel.len(), streams.len());
        for (chunks, data) in parallel.iter().zip(&streams) {
            assert_eq!(chunks, &chunk_data(data, 1024).unwrap());
        }

        let roots = xorb_hashes(&pool(2), &parallel);
        for (root, chunks) in roots.iter().zip(&parallel) {
            assert_eq!(*root, xorb_hash(chunks));
        }
    }

    #[test]
    fn empty_streams_yield_empty_lists() {
        let streams: Vec<&[u8]> = vec![&[], &[]];
        let out = chunk_streams(&pool(2), &streams, 1024).unwrap();
        assert!(out.iter().all(Vec::is_empty));
        assert!(xorb_hashes(&pool(2), &out).iter().all(MerkleHash::is_zero));
    }

    #[test]
    fn bad_target_fails_before_work() {
        let streams: Vec<&[u8]> = vec![b"abc"];
        let err = chunk_streams(&pool(1), &streams, 100).unwrap_err();
        assert!(matches!(err, XetError::TargetNotPowerOfTwo(100)));
    }
}

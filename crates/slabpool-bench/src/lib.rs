//! Benchmark workloads for slabpool.
//!
//! Provides pre-built pools and operation scripts shared by the criterion
//! benches:
//!
//! - [`warm_pool`]: a pool whose free list already holds `chunks` entries
//! - [`churn_script`]: a deterministic allocate/release pattern
//! - [`SIZE_CLASSES`]: the size-class ladder used by `size_class_ops`

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use slabpool::{ChunkPool, PoolError};
use slabpool_test_utils::Op;

/// Power-of-two size-class ladder from 8 bytes to 1KB.
pub const SIZE_CLASSES: [usize; 8] = [8, 16, 32, 64, 128, 256, 512, 1024];

/// Build a pool for `item_size` chunks with at least `chunks` already carved
/// and sitting on the free list, so the measured loop never creates a block.
pub fn warm_pool(item_size: usize, chunks: usize) -> Result<ChunkPool, PoolError> {
    let mut pool = ChunkPool::with_item_size(item_size)?;
    let held = (0..chunks)
        .map(|_| pool.allocate())
        .collect::<Result<Vec<_>, _>>()?;
    for h in held {
        pool.release(Some(h))?;
    }
    Ok(pool)
}

/// Deterministic churn: bursts of `burst` allocations followed by releasing
/// every other live chunk, repeated `rounds` times.
///
/// The release selector walks a fixed stride so successive runs produce the
/// same free-list order.
pub fn churn_script(rounds: usize, burst: usize) -> Vec<Op> {
    let mut ops = Vec::with_capacity(rounds * burst * 2);
    let mut live = 0usize;
    for round in 0..rounds {
        ops.extend(std::iter::repeat(Op::Allocate).take(burst));
        live += burst;
        let releases = live / 2;
        for i in 0..releases {
            ops.push(Op::Release(round.wrapping_mul(7919).wrapping_add(i * 31)));
        }
        live -= releases;
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warm_pool_has_free_chunks() {
        let pool = warm_pool(64, 100).unwrap();
        assert_eq!(pool.current(), 0);
        assert!(pool.free_count() >= 100);
    }

    #[test]
    fn churn_script_never_releases_more_than_live() {
        let mut live = 0isize;
        for op in churn_script(10, 16) {
            match op {
                Op::Allocate => live += 1,
                Op::Release(_) => live -= 1,
                Op::Track => {}
            }
            assert!(live >= 0);
        }
    }
}

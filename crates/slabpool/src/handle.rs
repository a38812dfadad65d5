//! Chunk handles.
//!
//! A [`ChunkHandle`] stands in for the raw pointer a C-style pool would hand
//! out. It names a chunk by its flat index within the owning pool
//! (`block_index * chunks_per_block + slot`) and carries the pool's
//! [`PoolId`] so that a release into the wrong pool is caught in O(1).

use std::fmt;

use crate::id::PoolId;

/// Exclusive claim on one allocated chunk.
///
/// Only a pool can mint a handle. Handles are deliberately not `Copy` or
/// `Clone`: [`ChunkPool::release`](crate::ChunkPool::release) consumes the
/// handle, so each allocation can be released at most once.
///
/// Dropping a handle without releasing it leaks the chunk back to nobody:
/// the pool keeps counting it as live until the pool itself is dropped.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a ChunkHandle leaks the chunk until the pool is dropped"]
pub struct ChunkHandle {
    pool: PoolId,
    index: u32,
}

impl ChunkHandle {
    pub(crate) fn new(pool: PoolId, index: u32) -> Self {
        Self { pool, index }
    }

    /// The pool that allocated this chunk.
    pub fn pool_id(&self) -> PoolId {
        self.pool
    }

    /// Flat index of the chunk within its pool.
    ///
    /// Indices are stable for the lifetime of the pool: a chunk released and
    /// reallocated keeps its index, and therefore its storage address.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for ChunkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk(pool={}, index={})", self.pool, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_round_trip() {
        let pool = PoolId::next();
        let h = ChunkHandle::new(pool, 17);
        assert_eq!(h.pool_id(), pool);
        assert_eq!(h.index(), 17);
    }

    #[test]
    fn display_names_pool_and_index() {
        let pool = PoolId::next();
        let h = ChunkHandle::new(pool, 3);
        assert_eq!(h.to_string(), format!("Chunk(pool={pool}, index=3)"));
    }
}

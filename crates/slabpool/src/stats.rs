//! Point-in-time pool statistics.

use std::fmt;

/// Counters describing a pool at one instant.
///
/// Returned by [`ChunkPool::stats`](crate::ChunkPool::stats). The `Display`
/// form is the one-line summary that
/// [`ChunkPool::trace`](crate::ChunkPool::trace) logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Configured chunk size in bytes.
    pub item_size: usize,
    /// Chunks currently allocated.
    pub current: usize,
    /// High-water mark of `current`.
    pub peak: usize,
    /// Cumulative number of successful allocations.
    pub lifetime: u64,
    /// Allocations not yet acknowledged by `track()`.
    pub untracked: usize,
    /// Blocks owned by the pool.
    pub blocks: usize,
    /// Chunks on the free list.
    pub free: usize,
}

impl PoolStats {
    /// Peak footprint of live chunks in KiB (`peak * item_size / 1024`).
    pub fn peak_kib(&self) -> usize {
        self.peak.saturating_mul(self.item_size) / 1024
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "watermark={} [{}k] current={} size={} nAlloc={} blocks={}",
            self.peak,
            self.peak_kib(),
            self.current,
            self.item_size,
            self.lifetime,
            self.blocks
        )
    }
}

//! Pool identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`PoolId`] allocation.
static POOL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a pool.
///
/// Allocated from a monotonic atomic counter via [`PoolId::next`]. Two
/// distinct pools always have different IDs, even after one is dropped and
/// another created at the same address, so a handle minted by a dead pool
/// can never be mistaken for one of a live pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(u64);

impl PoolId {
    /// Allocate a fresh, unique pool ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(POOL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

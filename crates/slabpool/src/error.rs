//! Pool error types.

use std::error::Error;
use std::fmt;

use crate::handle::ChunkHandle;
use crate::id::PoolId;

/// Errors that can occur during pool operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The pool configuration is unusable (e.g. zero item size).
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
    /// The system allocator refused to provide a new block.
    ///
    /// The pool performs no retry; the caller decides whether this is fatal.
    BlockAllocationFailed {
        /// Size of the block that could not be allocated, in bytes.
        bytes: usize,
    },
    /// Another block would push chunk indices past `u32::MAX`.
    ChunkIndexOverflow {
        /// Chunks already carved when the block was refused.
        capacity: usize,
    },
    /// The configured block limit has been reached and the free list is empty.
    CapacityExceeded {
        /// The configured maximum number of blocks.
        max_blocks: u32,
    },
    /// A chunk handle was presented to a pool that did not allocate it.
    ForeignChunk {
        /// The pool that minted the handle.
        chunk_pool: PoolId,
        /// The pool the handle was presented to.
        pool: PoolId,
    },
    /// A chunk handle names a pool that is not registered with the allocator.
    UnknownPool {
        /// The pool that minted the handle.
        chunk_pool: PoolId,
    },
    /// `track()` was called more often than chunks were allocated.
    OverTracked,
    /// No registered size class can hold the requested length.
    NoSizeClass {
        /// Requested allocation length in bytes.
        requested: usize,
        /// Largest registered item size, if any class is registered.
        largest: Option<usize>,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { reason } => write!(f, "invalid pool config: {reason}"),
            Self::BlockAllocationFailed { bytes } => {
                write!(f, "failed to allocate a {bytes}-byte block")
            }
            Self::ChunkIndexOverflow { capacity } => {
                write!(f, "chunk index space exhausted after {capacity} chunks")
            }
            Self::CapacityExceeded { max_blocks } => {
                write!(f, "pool capacity exceeded: {max_blocks} blocks in use")
            }
            Self::ForeignChunk { chunk_pool, pool } => {
                write!(f, "chunk from pool {chunk_pool} presented to pool {pool}")
            }
            Self::UnknownPool { chunk_pool } => {
                write!(f, "chunk from unregistered pool {chunk_pool}")
            }
            Self::OverTracked => write!(f, "track() called with no untracked allocations"),
            Self::NoSizeClass { requested, largest } => match largest {
                Some(largest) => write!(
                    f,
                    "no size class for {requested} bytes (largest class is {largest} bytes)"
                ),
                None => write!(f, "no size class for {requested} bytes (no classes registered)"),
            },
        }
    }
}

impl Error for PoolError {}

/// A rejected release, carrying the handle back to the caller.
///
/// The handle is still a valid claim on its chunk in the pool that minted
/// it, so it can be released there instead of being leaked.
#[derive(Debug, PartialEq, Eq)]
pub struct ReleaseError {
    /// Why the release was rejected.
    pub error: PoolError,
    /// The handle that was presented, unchanged.
    pub handle: ChunkHandle,
}

impl ReleaseError {
    /// Take back the handle, discarding the error.
    pub fn into_handle(self) -> ChunkHandle {
        self.handle
    }
}

impl fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "release of {} rejected: {}", self.handle, self.error)
    }
}

impl Error for ReleaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

impl From<ReleaseError> for PoolError {
    fn from(err: ReleaseError) -> Self {
        err.error
    }
}

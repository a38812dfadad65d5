//! Pool configuration parameters.

use crate::error::PoolError;

/// Configuration for a [`ChunkPool`](crate::ChunkPool).
///
/// Controls chunk sizing, block sizing, and an optional block limit.
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Size of every chunk in bytes. Must be non-zero.
    pub item_size: usize,

    /// Target size of each block in bytes.
    ///
    /// Default: 4096. The number of chunks per block is
    /// `max(1, block_bytes / item_size)`, so pools of items larger than
    /// `block_bytes` fall back to one chunk per block.
    pub block_bytes: usize,

    /// Maximum number of blocks the pool may create.
    ///
    /// Default: `None` (grow until the system allocator refuses).
    pub max_blocks: Option<u32>,
}

impl PoolConfig {
    /// Default block size: one 4KB page.
    pub const DEFAULT_BLOCK_BYTES: usize = 4096;

    /// Create a config for the given item size with default block sizing.
    pub fn new(item_size: usize) -> Self {
        Self {
            item_size,
            block_bytes: Self::DEFAULT_BLOCK_BYTES,
            max_blocks: None,
        }
    }

    /// Override the target block size.
    pub fn with_block_bytes(mut self, block_bytes: usize) -> Self {
        self.block_bytes = block_bytes;
        self
    }

    /// Cap the number of blocks the pool may create.
    pub fn with_max_blocks(mut self, max_blocks: u32) -> Self {
        self.max_blocks = Some(max_blocks);
        self
    }

    /// Number of chunks carved from each block.
    pub fn chunks_per_block(&self) -> usize {
        (self.block_bytes / self.item_size.max(1)).max(1)
    }

    /// Actual size of each block in bytes (`chunks_per_block * item_size`).
    pub fn block_len(&self) -> usize {
        self.chunks_per_block() * self.item_size
    }

    /// Check that the configuration can back a pool.
    ///
    /// Besides the obvious non-zero checks, the total chunk count must fit a
    /// `u32` chunk index for every block the pool is allowed to create.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.item_size == 0 {
            return Err(PoolError::InvalidConfig {
                reason: "item_size must be non-zero".into(),
            });
        }
        if self.block_bytes == 0 {
            return Err(PoolError::InvalidConfig {
                reason: "block_bytes must be non-zero".into(),
            });
        }
        if self.max_blocks == Some(0) {
            return Err(PoolError::InvalidConfig {
                reason: "max_blocks must be at least 1 when set".into(),
            });
        }
        if u32::try_from(self.chunks_per_block()).is_err() {
            return Err(PoolError::InvalidConfig {
                reason: format!(
                    "{} chunks per block exceeds the chunk index range",
                    self.chunks_per_block()
                ),
            });
        }
        Ok(())
    }
}

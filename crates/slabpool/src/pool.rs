//! The fixed-chunk pool.
//!
//! [`ChunkPool`] owns a list of [`Block`]s and a LIFO stack of free chunk
//! indices. The lifecycle is:
//! 1. `allocate()` pops the free stack, creating a block first if it is empty
//! 2. the caller reads and writes through `chunk()` / `chunk_mut()`
//! 3. `release()` consumes the handle and pushes the index back
//!
//! Blocks are created lazily and only dropped with the pool.

use std::fmt;

use smallvec::SmallVec;

use crate::block::Block;
use crate::config::PoolConfig;
use crate::error::{PoolError, ReleaseError};
use crate::handle::ChunkHandle;
use crate::id::PoolId;
use crate::poison;
use crate::stats::PoolStats;
use crate::traits::ChunkAllocator;

/// Inline capacity of the block list before it spills to the heap.
const INLINE_BLOCKS: usize = 10;

/// Free-list pool of fixed-size chunks.
///
/// Allocation and release are O(1); block creation is O(chunks per block)
/// and happens only when the free stack is empty. Peak memory is retained
/// until the pool is dropped: blocks are never returned individually, even
/// when every chunk in them is free.
///
/// The pool is single-threaded by construction: every mutating operation
/// takes `&mut self`.
pub struct ChunkPool {
    id: PoolId,
    config: PoolConfig,
    chunks_per_block: usize,
    /// Owned blocks in creation order. Indices into this list never change.
    blocks: SmallVec<[Block; INLINE_BLOCKS]>,
    /// Free chunk indices; the top of the stack is handed out next.
    free: Vec<u32>,
    current: usize,
    peak: usize,
    lifetime: u64,
    untracked: usize,
}

impl ChunkPool {
    /// Create an empty pool. No block is allocated until the first
    /// `allocate()`.
    ///
    /// Returns `Err(PoolError::InvalidConfig)` if `config` fails validation.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        Ok(Self {
            id: PoolId::next(),
            chunks_per_block: config.chunks_per_block(),
            config,
            blocks: SmallVec::new(),
            free: Vec::new(),
            current: 0,
            peak: 0,
            lifetime: 0,
            untracked: 0,
        })
    }

    /// Create a pool for `item_size`-byte chunks with default block sizing.
    pub fn with_item_size(item_size: usize) -> Result<Self, PoolError> {
        Self::new(PoolConfig::new(item_size))
    }

    /// Identity of this pool.
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// The configuration this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Fixed chunk size in bytes.
    pub fn item_size(&self) -> usize {
        self.config.item_size
    }

    /// Number of chunks carved from each block.
    pub fn chunks_per_block(&self) -> usize {
        self.chunks_per_block
    }

    /// Allocate one chunk.
    ///
    /// The returned storage is not cleared: a reused chunk still holds
    /// whatever its previous owner left (or the poison pattern in debug
    /// builds). A fresh block starts zero-filled.
    ///
    /// Returns `Err(PoolError::CapacityExceeded)` if a new block is needed
    /// but `max_blocks` is reached, or `Err(PoolError::BlockAllocationFailed)`
    /// if the system allocator refuses the block. Neither is retried.
    pub fn allocate(&mut self) -> Result<ChunkHandle, PoolError> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => self.grow()?,
        };
        self.current += 1;
        if self.current > self.peak {
            self.peak = self.current;
        }
        self.lifetime += 1;
        self.untracked += 1;
        Ok(ChunkHandle::new(self.id, index))
    }

    /// Return a chunk to the pool.
    ///
    /// `None` is accepted and ignored. In debug builds the chunk's bytes are
    /// overwritten with a poison pattern before it goes back on the free
    /// stack. The chunk becomes the next one handed out.
    ///
    /// Returns a [`ReleaseError`] wrapping `PoolError::ForeignChunk` if the
    /// handle was minted by a different pool. The pool's state is unchanged
    /// and the handle is handed back for release into its own pool.
    pub fn release(&mut self, chunk: Option<ChunkHandle>) -> Result<(), ReleaseError> {
        let Some(chunk) = chunk else {
            return Ok(());
        };
        if let Err(error) = self.check_owner(&chunk) {
            return Err(ReleaseError {
                error,
                handle: chunk,
            });
        }
        let (block, slot) = self.locate(chunk.index());
        poison::poison(self.blocks[block].chunk_mut(slot));
        self.current -= 1;
        self.free.push(chunk.index());
        Ok(())
    }

    /// Acknowledge one allocation as accounted for by the caller.
    ///
    /// Only touches the untracked counter. Returns
    /// `Err(PoolError::OverTracked)` without changing anything if there is
    /// no untracked allocation left to acknowledge.
    pub fn track(&mut self) -> Result<(), PoolError> {
        if self.untracked == 0 {
            tracing::warn!(pool = %self.id, "track() with no untracked allocations");
            return Err(PoolError::OverTracked);
        }
        self.untracked -= 1;
        Ok(())
    }

    /// Log a one-line summary of the pool's counters at INFO level.
    pub fn trace(&self, label: &str) {
        let stats = self.stats();
        tracing::info!(
            pool = label,
            watermark = stats.peak,
            watermark_kib = stats.peak_kib(),
            current = stats.current,
            item_size = stats.item_size,
            lifetime = stats.lifetime,
            blocks = stats.blocks,
            "Mempool {label} {stats}"
        );
    }

    /// Shared view of an allocated chunk, exactly `item_size()` bytes long.
    pub fn chunk(&self, handle: &ChunkHandle) -> Result<&[u8], PoolError> {
        self.check_owner(handle)?;
        let (block, slot) = self.locate(handle.index());
        Ok(self.blocks[block].chunk(slot))
    }

    /// Mutable view of an allocated chunk, exactly `item_size()` bytes long.
    pub fn chunk_mut(&mut self, handle: &ChunkHandle) -> Result<&mut [u8], PoolError> {
        self.check_owner(handle)?;
        let (block, slot) = self.locate(handle.index());
        Ok(self.blocks[block].chunk_mut(slot))
    }

    /// Chunks currently allocated.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Highest number of chunks ever allocated at once.
    pub fn peak(&self) -> usize {
        self.peak
    }

    /// Cumulative number of successful allocations.
    pub fn lifetime(&self) -> u64 {
        self.lifetime
    }

    /// Allocations not yet acknowledged by `track()`.
    pub fn untracked(&self) -> usize {
        self.untracked
    }

    /// Number of blocks owned by the pool.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Chunks on the free stack.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total chunks carved so far (`block_count * chunks_per_block`).
    pub fn capacity(&self) -> usize {
        self.blocks.len() * self.chunks_per_block
    }

    /// Memory held by blocks, in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.blocks.iter().map(Block::memory_bytes).sum()
    }

    /// Snapshot of all counters.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            item_size: self.item_size(),
            current: self.current,
            peak: self.peak,
            lifetime: self.lifetime,
            untracked: self.untracked,
            blocks: self.blocks.len(),
            free: self.free.len(),
        }
    }

    /// Create a block, stack all but its first chunk, and return the first.
    fn grow(&mut self) -> Result<u32, PoolError> {
        if let Some(max_blocks) = self.config.max_blocks {
            if self.blocks.len() >= max_blocks as usize {
                return Err(PoolError::CapacityExceeded { max_blocks });
            }
        }

        let (first, end) = block_index_range(self.capacity(), self.chunks_per_block)?;
        let block = Block::new(self.item_size(), self.chunks_per_block)?;
        self.blocks.push(block);
        // Reverse order so the block's chunks come out lowest index first.
        self.free.extend((first + 1..end).rev());

        tracing::debug!(
            pool = %self.id,
            block = self.blocks.len() - 1,
            chunks = self.chunks_per_block,
            item_size = self.item_size(),
            "allocated pool block"
        );
        Ok(first)
    }

    fn locate(&self, index: u32) -> (usize, usize) {
        let index = index as usize;
        (index / self.chunks_per_block, index % self.chunks_per_block)
    }

    fn check_owner(&self, handle: &ChunkHandle) -> Result<(), PoolError> {
        if handle.pool_id() == self.id {
            return Ok(());
        }
        tracing::warn!(
            pool = %self.id,
            chunk_pool = %handle.pool_id(),
            index = handle.index(),
            "chunk presented to a pool that did not allocate it"
        );
        Err(PoolError::ForeignChunk {
            chunk_pool: handle.pool_id(),
            pool: self.id,
        })
    }
}

/// Chunk index range `first..end` of the next block.
///
/// Chunk indices are `u32`; a block whose indices would not fit is refused.
fn block_index_range(capacity: usize, chunks_per_block: usize) -> Result<(u32, u32), PoolError> {
    let end = capacity.checked_add(chunks_per_block);
    match (u32::try_from(capacity), end.map(u32::try_from)) {
        (Ok(first), Some(Ok(end))) => Ok((first, end)),
        _ => Err(PoolError::ChunkIndexOverflow { capacity }),
    }
}

impl ChunkAllocator for ChunkPool {
    fn pool_id(&self) -> PoolId {
        self.id
    }

    fn item_size(&self) -> usize {
        ChunkPool::item_size(self)
    }

    fn allocate(&mut self) -> Result<ChunkHandle, PoolError> {
        ChunkPool::allocate(self)
    }

    fn release(&mut self, chunk: Option<ChunkHandle>) -> Result<(), ReleaseError> {
        ChunkPool::release(self, chunk)
    }

    fn track(&mut self) -> Result<(), PoolError> {
        ChunkPool::track(self)
    }

    fn chunk(&self, handle: &ChunkHandle) -> Result<&[u8], PoolError> {
        ChunkPool::chunk(self, handle)
    }

    fn chunk_mut(&mut self, handle: &ChunkHandle) -> Result<&mut [u8], PoolError> {
        ChunkPool::chunk_mut(self, handle)
    }
}

impl fmt::Debug for ChunkPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkPool")
            .field("id", &self.id)
            .field("item_size", &self.item_size())
            .field("chunks_per_block", &self.chunks_per_block)
            .field("blocks", &self.blocks.len())
            .field("current", &self.current)
            .field("peak", &self.peak)
            .finish()
    }
}

impl Drop for ChunkPool {
    fn drop(&mut self) {
        if self.current > 0 {
            tracing::debug!(
                pool = %self.id,
                live = self.current,
                blocks = self.blocks.len(),
                "dropping pool with live chunks"
            );
        }
    }
}

//! Size-class layering over several pools.
//!
//! [`SizeClassAllocator`] holds one [`ChunkAllocator`] per item size and
//! serves variable-length requests from the smallest class that fits. Pools
//! are keyed by [`PoolId`], so a release or lookup is routed straight to the
//! pool that minted the handle without a size search.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{PoolError, ReleaseError};
use crate::handle::ChunkHandle;
use crate::id::PoolId;
use crate::pool::ChunkPool;
use crate::traits::ChunkAllocator;

/// Dispatches allocations across pools of differing chunk sizes.
///
/// Classes are kept in ascending `item_size` order; each item size may be
/// registered once. A request for `len` bytes is served by the first class
/// with `item_size >= len`, so the caller gets a chunk of at least `len`
/// bytes (and exactly that class's `item_size`).
#[derive(Default)]
pub struct SizeClassAllocator {
    classes: IndexMap<PoolId, Box<dyn ChunkAllocator>>,
}

impl SizeClassAllocator {
    /// Create an allocator with no size classes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one default-configured [`ChunkPool`] per item size.
    ///
    /// Returns `Err(PoolError::InvalidConfig)` for a zero or duplicate size.
    pub fn from_sizes(sizes: &[usize]) -> Result<Self, PoolError> {
        let mut allocator = Self::new();
        for &size in sizes {
            allocator.insert(Box::new(ChunkPool::with_item_size(size)?))?;
        }
        Ok(allocator)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_pool(mut self, pool: impl ChunkAllocator + 'static) -> Result<Self, PoolError> {
        self.insert(Box::new(pool))?;
        Ok(self)
    }

    /// Register a pool as a size class.
    ///
    /// Returns `Err(PoolError::InvalidConfig)` if a class with the same
    /// `item_size` or the same `pool_id` is already registered; the
    /// existing class is kept.
    pub fn insert(&mut self, pool: Box<dyn ChunkAllocator>) -> Result<(), PoolError> {
        let id = pool.pool_id();
        if self.classes.contains_key(&id) {
            return Err(PoolError::InvalidConfig {
                reason: format!("pool {id} is already registered"),
            });
        }
        let size = pool.item_size();
        if self.classes.values().any(|p| p.item_size() == size) {
            return Err(PoolError::InvalidConfig {
                reason: format!("size class {size} is already registered"),
            });
        }
        self.classes.insert(id, pool);
        self.classes.sort_by(|_, a, _, b| a.item_size().cmp(&b.item_size()));
        Ok(())
    }

    /// Allocate a chunk of at least `len` bytes from the smallest fitting
    /// class.
    ///
    /// Returns `Err(PoolError::NoSizeClass)` if no class is large enough,
    /// or whatever the chosen pool's `allocate()` returns.
    pub fn allocate(&mut self, len: usize) -> Result<ChunkHandle, PoolError> {
        let largest = self.largest_class();
        let Some(pool) = self.classes.values_mut().find(|p| p.item_size() >= len) else {
            return Err(PoolError::NoSizeClass {
                requested: len,
                largest,
            });
        };
        pool.allocate()
    }

    /// Return a chunk to the pool that minted it. `None` is a no-op.
    ///
    /// A handle from an unregistered pool is rejected with
    /// [`PoolError::UnknownPool`] and handed back in the [`ReleaseError`].
    pub fn release(&mut self, chunk: Option<ChunkHandle>) -> Result<(), ReleaseError> {
        let Some(chunk) = chunk else {
            return Ok(());
        };
        match self.classes.get_mut(&chunk.pool_id()) {
            Some(pool) => pool.release(Some(chunk)),
            None => Err(ReleaseError {
                error: PoolError::UnknownPool {
                    chunk_pool: chunk.pool_id(),
                },
                handle: chunk,
            }),
        }
    }

    /// Acknowledge the allocation behind `handle` in its owning pool.
    pub fn track(&mut self, handle: &ChunkHandle) -> Result<(), PoolError> {
        self.owner_mut(handle)?.track()
    }

    /// Shared view of an allocated chunk.
    pub fn chunk(&self, handle: &ChunkHandle) -> Result<&[u8], PoolError> {
        self.owner(handle)?.chunk(handle)
    }

    /// Mutable view of an allocated chunk.
    pub fn chunk_mut(&mut self, handle: &ChunkHandle) -> Result<&mut [u8], PoolError> {
        self.owner_mut(handle)?.chunk_mut(handle)
    }

    /// The registered pool with the given ID, if any.
    pub fn pool(&self, id: PoolId) -> Option<&dyn ChunkAllocator> {
        self.classes.get(&id).map(|p| &**p)
    }

    /// Registered item sizes in ascending order.
    pub fn class_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.classes.values().map(|p| p.item_size())
    }

    /// Number of registered size classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no size class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn largest_class(&self) -> Option<usize> {
        self.classes.values().last().map(|p| p.item_size())
    }

    fn owner(&self, handle: &ChunkHandle) -> Result<&dyn ChunkAllocator, PoolError> {
        self.pool(handle.pool_id()).ok_or(PoolError::UnknownPool {
            chunk_pool: handle.pool_id(),
        })
    }

    fn owner_mut(
        &mut self,
        handle: &ChunkHandle,
    ) -> Result<&mut Box<dyn ChunkAllocator>, PoolError> {
        self.classes
            .get_mut(&handle.pool_id())
            .ok_or(PoolError::UnknownPool {
                chunk_pool: handle.pool_id(),
            })
    }
}

impl fmt::Debug for SizeClassAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.class_sizes()).finish()
    }
}

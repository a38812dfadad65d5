//! The pool capability trait.

use crate::error::{PoolError, ReleaseError};
use crate::handle::ChunkHandle;
use crate::id::PoolId;

/// Minimal capability set shared by fixed-chunk pools.
///
/// Lets an owner hold pools of differing chunk sizes behind one
/// `Box<dyn ChunkAllocator>` handle and dispatch through it, as
/// [`SizeClassAllocator`](crate::SizeClassAllocator) does.
pub trait ChunkAllocator {
    /// Identity of this pool; matches [`ChunkHandle::pool_id`] for every
    /// handle it mints.
    fn pool_id(&self) -> PoolId;

    /// Fixed chunk size in bytes.
    fn item_size(&self) -> usize;

    /// Allocate one chunk of exactly `item_size()` bytes.
    fn allocate(&mut self) -> Result<ChunkHandle, PoolError>;

    /// Return a chunk to the pool. `None` is a no-op.
    ///
    /// A rejected handle comes back inside the [`ReleaseError`].
    fn release(&mut self, chunk: Option<ChunkHandle>) -> Result<(), ReleaseError>;

    /// Acknowledge one allocation as accounted for elsewhere.
    fn track(&mut self) -> Result<(), PoolError>;

    /// Shared view of an allocated chunk.
    fn chunk(&self, handle: &ChunkHandle) -> Result<&[u8], PoolError>;

    /// Mutable view of an allocated chunk.
    fn chunk_mut(&mut self, handle: &ChunkHandle) -> Result<&mut [u8], PoolError>;
}

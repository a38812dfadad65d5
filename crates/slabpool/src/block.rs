//! Contiguous chunk blocks.
//!
//! A [`Block`] is one contiguous heap allocation carved into a fixed number of
//! equally sized chunks. Blocks are never resized or moved: the boxed slice
//! keeps its address even when the pool's block list grows and relocates the
//! `Box` pointers themselves.

use crate::error::PoolError;

/// A single contiguous run of fixed-size chunks.
pub struct Block {
    /// Backing storage, `chunk_count * item_size` bytes.
    data: Box<[u8]>,
    item_size: usize,
    chunk_count: usize,
}

impl Block {
    /// Allocate a block of `chunk_count` chunks of `item_size` bytes each.
    ///
    /// The storage is zero-filled on creation; it is not poisoned. Returns
    /// `Err(PoolError::BlockAllocationFailed)` if the size overflows or the
    /// system allocator refuses the reservation.
    pub fn new(item_size: usize, chunk_count: usize) -> Result<Self, PoolError> {
        let bytes = item_size
            .checked_mul(chunk_count)
            .ok_or(PoolError::BlockAllocationFailed { bytes: usize::MAX })?;
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| PoolError::BlockAllocationFailed { bytes })?;
        data.resize(bytes, 0u8);
        Ok(Self {
            data: data.into_boxed_slice(),
            item_size,
            chunk_count,
        })
    }

    /// Number of chunks in this block.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Shared view of the chunk at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= chunk_count()`.
    pub fn chunk(&self, slot: usize) -> &[u8] {
        let start = slot * self.item_size;
        &self.data[start..start + self.item_size]
    }

    /// Mutable view of the chunk at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot >= chunk_count()`.
    pub fn chunk_mut(&mut self, slot: usize) -> &mut [u8] {
        let start = slot * self.item_size;
        &mut self.data[start..start + self.item_size]
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_is_zeroed() {
        let block = Block::new(16, 4).unwrap();
        assert_eq!(block.chunk_count(), 4);
        assert_eq!(block.memory_bytes(), 64);
        assert!((0..4).all(|i| block.chunk(i).iter().all(|&b| b == 0)));
    }

    #[test]
    fn chunks_do_not_overlap() {
        let mut block = Block::new(8, 3).unwrap();
        block.chunk_mut(0).fill(1);
        block.chunk_mut(1).fill(2);
        block.chunk_mut(2).fill(3);
        assert_eq!(block.chunk(0), &[1; 8]);
        assert_eq!(block.chunk(1), &[2; 8]);
        assert_eq!(block.chunk(2), &[3; 8]);
    }

    #[test]
    fn chunk_addresses_are_contiguous() {
        let block = Block::new(32, 2).unwrap();
        let a = block.chunk(0).as_ptr() as usize;
        let b = block.chunk(1).as_ptr() as usize;
        assert_eq!(b - a, 32);
    }

    #[test]
    fn overflowing_size_is_an_error_not_a_panic() {
        let result = Block::new(usize::MAX, 2);
        assert!(matches!(
            result,
            Err(PoolError::BlockAllocationFailed { .. })
        ));
    }

    #[test]
    #[should_panic]
    fn out_of_range_slot_panics() {
        let block = Block::new(8, 2).unwrap();
        let _ = block.chunk(2);
    }
}

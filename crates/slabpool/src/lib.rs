//! Fixed-chunk memory pools.
//!
//! A [`ChunkPool`] hands out fixed-size byte chunks with O(1) allocate and
//! release. Chunks are carved in bulk from blocks of roughly 4KB; released
//! chunks go onto a LIFO free stack and are handed out again before any new
//! block is created. Blocks are never returned to the system allocator until
//! the pool itself is dropped.
//!
//! # Architecture
//!
//! ```text
//! SizeClassAllocator (optional layering, routes by PoolId)
//! └── Box<dyn ChunkAllocator> × N (one per item size)
//!     └── ChunkPool
//!         ├── SmallVec<[Block; 10]> (boxed byte slices, never moved)
//!         └── Vec<u32> free stack (chunk indices, LIFO)
//! ```
//!
//! # Safety model
//!
//! The free list is kept out of band as a stack of chunk indices, so no
//! chunk storage is ever reinterpreted as a link. Chunks are addressed through
//! a [`ChunkHandle`] which is tagged with the owning pool's [`PoolId`] and is
//! neither `Copy` nor `Clone`: releasing consumes the handle, so a double
//! release does not type-check. A foreign release is reported as
//! [`PoolError::ForeignChunk`] inside a [`ReleaseError`] that hands the
//! handle back, so the chunk can still be returned to its own pool.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod config;
pub mod error;
pub mod handle;
pub mod id;
mod poison;
pub mod pool;
pub mod size_class;
pub mod stats;
pub mod traits;

// Public re-exports for the primary API surface.
pub use config::PoolConfig;
pub use error::{PoolError, ReleaseError};
pub use handle::ChunkHandle;
pub use id::PoolId;
pub use pool::ChunkPool;
pub use size_class::SizeClassAllocator;
pub use stats::PoolStats;
pub use traits::ChunkAllocator;

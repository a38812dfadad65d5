//! Test utilities for slabpool development.
//!
//! Provides a counter-only reference model of a fixed-chunk pool
//! ([`ModelPool`]), the operation alphabet property tests draw from
//! ([`Op`]), and scripted scenarios with their expected checkpoints
//! ([`fixtures`]).
//!
//! Nothing here depends on `slabpool` itself, so the crate can be a
//! dev-dependency of it without a cycle.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

/// One step of a randomly generated pool workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    /// Allocate a chunk.
    Allocate,
    /// Release one live chunk; the payload picks which (modulo live count).
    /// Ignored when nothing is live.
    Release(usize),
    /// Call `track()`.
    Track,
}

/// Reference model of pool bookkeeping.
///
/// Tracks only counts: a block is "created" whenever an allocation finds
/// no free chunk, exactly like the real pool. Property tests drive the
/// model and the pool with the same operations and compare counters.
#[derive(Clone, Debug)]
pub struct ModelPool {
    chunks_per_block: usize,
    blocks: usize,
    current: usize,
    peak: usize,
    lifetime: u64,
    untracked: usize,
}

impl ModelPool {
    pub fn new(chunks_per_block: usize) -> Self {
        assert!(chunks_per_block > 0, "chunks_per_block must be positive");
        Self {
            chunks_per_block,
            blocks: 0,
            current: 0,
            peak: 0,
            lifetime: 0,
            untracked: 0,
        }
    }

    pub fn allocate(&mut self) {
        if self.current == self.blocks * self.chunks_per_block {
            self.blocks += 1;
        }
        self.current += 1;
        self.peak = self.peak.max(self.current);
        self.lifetime += 1;
        self.untracked += 1;
    }

    /// # Panics
    ///
    /// Panics if nothing is live; callers filter that case out first.
    pub fn release(&mut self) {
        assert!(self.current > 0, "model release with nothing live");
        self.current -= 1;
    }

    /// Returns whether the track was accepted.
    pub fn track(&mut self) -> bool {
        if self.untracked == 0 {
            return false;
        }
        self.untracked -= 1;
        true
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn peak(&self) -> usize {
        self.peak
    }

    pub fn lifetime(&self) -> u64 {
        self.lifetime
    }

    pub fn untracked(&self) -> usize {
        self.untracked
    }

    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn free(&self) -> usize {
        self.blocks * self.chunks_per_block - self.current
    }
}

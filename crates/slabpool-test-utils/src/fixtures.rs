//! Scripted pool workloads with expected counter values.

/// A batch of identical operations followed by the counters expected after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    /// Chunks to allocate in this step.
    pub allocate: usize,
    /// Chunks to release in this step (most recently allocated first).
    pub release: usize,
    /// Live chunks after this step.
    pub expect_current: usize,
    /// Highest live count seen so far.
    pub expect_peak: usize,
    /// Blocks the pool owns after this step.
    pub expect_blocks: usize,
}

/// Item size used by [`sixteen_byte_scenario`].
pub const SCENARIO_ITEM_SIZE: usize = 16;

/// The canonical 16-byte workload: 256 chunks fill exactly one 4KB block.
///
/// 1. allocate 256 → 1 block, current 256, peak 256
/// 2. release 10 → current 246, peak 256
/// 3. allocate 5 → current 251, still 1 block (reuses freed chunks)
/// 4. allocate 10 → current 261, second block created, peak 261
pub fn sixteen_byte_scenario() -> Vec<Checkpoint> {
    vec![
        Checkpoint {
            allocate: 256,
            release: 0,
            expect_current: 256,
            expect_peak: 256,
            expect_blocks: 1,
        },
        Checkpoint {
            allocate: 0,
            release: 10,
            expect_current: 246,
            expect_peak: 256,
            expect_blocks: 1,
        },
        Checkpoint {
            allocate: 5,
            release: 0,
            expect_current: 251,
            expect_peak: 256,
            expect_blocks: 1,
        },
        Checkpoint {
            allocate: 10,
            release: 0,
            expect_current: 261,
            expect_peak: 261,
            expect_blocks: 2,
        },
    ]
}

/// Byte written at offset `i` of the chunk with index `chunk_index` by
/// data-integrity tests.
pub fn pattern_byte(chunk_index: u32, i: usize) -> u8 {
    (chunk_index as usize).wrapping_mul(31).wrapping_add(i) as u8
}

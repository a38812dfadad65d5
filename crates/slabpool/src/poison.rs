//! Debug-build poisoning of released chunks.
//!
//! Released chunks are overwritten with [`POISON_BYTE`] when
//! `debug_assertions` are on, so a dangling reader sees an obviously bogus
//! pattern instead of plausible stale data. Freshly carved blocks are not
//! poisoned. Release builds compile this down to nothing.

/// Byte pattern written over released chunks in debug builds.
pub(crate) const POISON_BYTE: u8 = 0xFE;

/// Whether releases poison chunk contents in this build.
pub(crate) const ENABLED: bool = cfg!(debug_assertions);

/// Overwrite a released chunk with the poison pattern (debug builds only).
#[inline]
pub(crate) fn poison(chunk: &mut [u8]) {
    if ENABLED {
        chunk.fill(POISON_BYTE);
    }
}

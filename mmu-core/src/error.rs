//! The crate-wide error type (C9).
//!
//! Every fallible operation in the translation engine reports one of these
//! variants instead of panicking; only [`SimError::Internal`] indicates a bug
//! rather than a condition reachable from well-formed input.

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Every frame eligible for reclamation is either protected or already
    /// reserved as a page-table frame; the allocator has nothing to evict.
    #[error("no evictable frame available (all {total} frames are protected or pinned)")]
    NoEvictableFrame { total: usize },

    /// A write attempted to install a frame number outside the valid range.
    #[error("attempted to write invalid pfn {pfn} into a page-table entry")]
    InvalidPfnWrite { pfn: u8 },

    /// Invalidation reached a directory level that was unexpectedly absent,
    /// meaning the frame being evicted was not actually reachable.
    #[error("invalidation for pfn {victim} could not reach its leaf entry (vpn 0x{vpn:03x})")]
    UnreachableDuringInvalidation { victim: u8, vpn: u16 },

    /// The walker found a present leaf where `install` expected an absent one.
    #[error("page-table install for vpn 0x{vpn:03x} found an already-present leaf entry")]
    LeafAlreadyPresent { vpn: u16 },
}

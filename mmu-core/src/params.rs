//! # System Parameters
//!
//! Fixed dimensions of the simulated machine. Every other module derives its
//! bit widths and array sizes from the constants defined here; nothing in
//! this crate hardcodes a magic number that also appears below.
//!
//! ## Virtual address layout (bit 11 → bit 0)
//!
//! ```text
//! +-------+-------+-------+-------+
//! |  PD1  |  PD2  |  PT   |  OFF  |
//! | 3 bit | 3 bit | 3 bit | 3 bit |
//! +-------+-------+-------+-------+
//! 11    9 8     6 5     3 2      0
//! ```
//!
//! VPN is the upper 9 bits (`PD1 | PD2 | PT`); the physical address is
//! `(pfn << OFFSET_BITS) | offset`, 10 bits wide.

/// Width of a virtual address, in bits.
pub const VA_BITS: u32 = 12;

/// Width of the in-frame byte offset, in bits. Also `log2(FRAME_SIZE)`.
pub const OFFSET_BITS: u32 = 3;

/// Width of a virtual page number, in bits.
pub const VPN_BITS: u32 = 9;

/// Width of the top-level directory index (PD1), in bits.
pub const PD1_BITS: u32 = 3;

/// Width of the second-level directory index (PD2), in bits.
pub const PD2_BITS: u32 = 3;

/// Width of the leaf directory index (PT), in bits.
pub const PT_BITS: u32 = 3;

/// Number of physical frames backing the simulated machine.
///
/// `PFN` therefore fits in 7 bits (`NUM_FRAMES.ilog2() == 7`).
pub const NUM_FRAMES: usize = 128;

/// Bytes per physical frame. Also the number of PTEs a directory frame holds
/// (`FRAME_SIZE / PTE_SIZE`).
pub const FRAME_SIZE: usize = 8;

/// Bytes per page-table entry.
pub const PTE_SIZE: usize = 1;

/// Number of entries in the fully-associative TLB.
pub const TLB_SIZE: usize = 16;

/// PFN permanently occupied by the root page directory.
pub const ROOT_PD_PFN: u8 = 2;

/// Lowest PFN eligible for dynamic allocation or eviction.
pub const FIRST_DATA_PFN: u8 = 3;

/// Number of page-table entries per directory frame.
pub const PTES_PER_FRAME: usize = FRAME_SIZE / PTE_SIZE;

const _: () = {
    assert!(VPN_BITS as usize == PD1_BITS as usize + PD2_BITS as usize + PT_BITS as usize);
    assert!(VA_BITS as usize == VPN_BITS as usize + OFFSET_BITS as usize);
    assert!(NUM_FRAMES.is_power_of_two());
    assert!(1usize << OFFSET_BITS == FRAME_SIZE);
    assert!(PTES_PER_FRAME == 8);
    assert!((1usize << PD1_BITS) == PTES_PER_FRAME);
    assert!((FIRST_DATA_PFN as usize) < NUM_FRAMES);
    assert!((ROOT_PD_PFN as usize) < FIRST_DATA_PFN as usize);
};

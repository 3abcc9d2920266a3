//! # mmu-core
//!
//! Address-translation engine for a teaching-oriented CPU MMU: a 16-entry
//! fully-associative TLB backed by a three-level hierarchical page table,
//! over a simulated 128-frame physical memory.
//!
//! ```text
//!            virtual address (12 bits)
//!        +-----+-----+-----+-----+
//!        | PD1 | PD2 | PT  | OFF |
//!        +-----+-----+-----+-----+
//!           |     |     |
//!           v     v     v
//!   ROOT -> PD2 -> PT -> data frame
//!   (pfn2)  frame  frame  (pfn)
//! ```
//!
//! [`Simulator`] owns all mutable state (physical memory, TLB, allocator
//! cursors, the global tick) and is the only entry point callers need:
//! feed it [`VirtAddr`]s one at a time via [`Simulator::translate`] and it
//! emits [`Event`]s describing every step of the walk.
//!
//! Replacement policy ([`Policy::RoundRobin`] or [`Policy::Lru`]) is fixed
//! for the lifetime of a [`Simulator`] and governs both TLB and data-frame
//! eviction identically.

pub mod address;
pub mod engine;
pub mod error;
pub mod event;
pub mod frame_alloc;
pub mod invalidate;
pub mod memory;
pub mod page_table;
pub mod params;
pub mod policy;
pub mod pte;
pub mod tlb;

pub use address::{PhysAddr, Pfn, VirtAddr, Vpn};
pub use engine::Simulator;
pub use error::SimError;
pub use event::{Event, EventSink};
pub use policy::Policy;

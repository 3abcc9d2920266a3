//! Three-level page-table walker and updater (C6).
//!
//! ```text
//! ROOT_PD_PFN --pd1--> PD2 frame --pd2--> PT frame --pt--> data frame
//! ```
//!
//! Directory frames are allocated lazily: a walk that finds an absent
//! directory entry reports a miss; an install that finds one creates the
//! missing frame(s) on the way down to the leaf.

use crate::address::{Pfn, Vpn};
use crate::error::SimError;
use crate::frame_alloc::{Allocation, FrameAllocator};
use crate::memory::PhysicalMemory;
use crate::params::ROOT_PD_PFN;
use crate::pte::PageTableEntry;
use crate::tlb::Tlb;

/// Walks the page table for `vpn`, returning the mapped data frame if the
/// leaf entry is present. Does not allocate or mutate anything.
#[must_use]
pub fn walk(mem: &PhysicalMemory, vpn: Vpn) -> Option<Pfn> {
    let pd2_pte = mem.read_pte(Pfn::new(ROOT_PD_PFN), vpn.pd1());
    let pd2_pfn = pd2_pte.target()?;

    let pt_pte = mem.read_pte(pd2_pfn, vpn.pd2());
    let pt_pfn = pt_pte.target()?;

    let leaf = mem.read_pte(pt_pfn, vpn.pt());
    leaf.target()
}

/// Clears the leaf PTE for `vpn`, used by the invalidator (C8) when
/// reclaiming a data frame. Returns `None` if either directory level is
/// absent, meaning `vpn` was never actually reachable.
#[must_use]
pub fn clear_leaf(mem: &mut PhysicalMemory, vpn: Vpn) -> Option<()> {
    let pd2_pfn = mem.read_pte(Pfn::new(ROOT_PD_PFN), vpn.pd1()).target()?;
    let pt_pfn = mem.read_pte(pd2_pfn, vpn.pd2()).target()?;
    let leaf = mem.read_pte(pt_pfn, vpn.pt());
    mem.write_pte(pt_pfn, vpn.pt(), leaf.cleared());
    Some(())
}

/// Which frames ended up evicted while installing a mapping, for the
/// diagnostic log (C10); the TLB/PTE invalidation itself already happened
/// inside [`FrameAllocator::allocate`] by the time this is returned.
pub struct InstallOutcome {
    pub evicted: Vec<Pfn>,
}

/// Installs `vpn -> data_pfn` into the page table, allocating any missing
/// directory frame. Must only be called after [`walk`] reported a miss for
/// this `vpn`; a present leaf at the target slot is an invariant violation.
pub fn install(
    mem: &mut PhysicalMemory,
    alloc: &mut FrameAllocator,
    tlb: &mut Tlb,
    vpn: Vpn,
    data_pfn: Pfn,
    tick: u64,
) -> Result<InstallOutcome, SimError> {
    let mut evicted = Vec::new();

    let pd2_pfn = ensure_directory(mem, alloc, tlb, Pfn::new(ROOT_PD_PFN), vpn.pd1(), tick, &mut evicted)?;
    let pt_pfn = ensure_directory(mem, alloc, tlb, pd2_pfn, vpn.pd2(), tick, &mut evicted)?;

    let leaf = mem.read_pte(pt_pfn, vpn.pt());
    if leaf.present() {
        return Err(SimError::LeafAlreadyPresent { vpn: vpn.as_u16() });
    }
    mem.write_pte(pt_pfn, vpn.pt(), PageTableEntry::present_at(data_pfn)?);
    mem.frame_mut(data_pfn).vpn_mapped = Some(vpn);

    Ok(InstallOutcome { evicted })
}

/// Reads the directory entry at `(parent, index)`, allocating and wiring a
/// fresh directory frame if it is absent.
fn ensure_directory(
    mem: &mut PhysicalMemory,
    alloc: &mut FrameAllocator,
    tlb: &mut Tlb,
    parent: Pfn,
    index: usize,
    tick: u64,
    evicted: &mut Vec<Pfn>,
) -> Result<Pfn, SimError> {
    let entry = mem.read_pte(parent, index);
    if let Some(pfn) = entry.target() {
        return Ok(pfn);
    }

    let allocation = alloc.allocate(mem, tlb, true, tick)?;
    if let Allocation::Evicted(pfn) = allocation {
        evicted.push(pfn);
    }
    let child_pfn = allocation.pfn();
    log::trace!(
        "allocated directory frame pfn=0x{:02x} under parent=0x{:02x}[{index}]",
        child_pfn.as_u8(),
        parent.as_u8()
    );

    // The frame is reused as a directory; any leftover PTE bytes from a
    // prior tenant are stale and must not be reinterpreted as entries.
    for slot in 0..crate::params::PTES_PER_FRAME {
        mem.write_pte(child_pfn, slot, PageTableEntry::absent());
    }

    mem.write_pte(parent, index, PageTableEntry::present_at(child_pfn)?);
    Ok(child_pfn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;

    fn root(mem: &mut PhysicalMemory) {
        mem.frame_mut(Pfn::new(ROOT_PD_PFN)).allocated = true;
        mem.frame_mut(Pfn::new(ROOT_PD_PFN)).is_page_table = true;
    }

    #[test]
    fn walk_misses_on_empty_table() {
        let mem = PhysicalMemory::new();
        assert_eq!(walk(&mem, Vpn::new(0x020)), None);
    }

    #[test]
    fn install_then_walk_hits() {
        let mut mem = PhysicalMemory::new();
        let mut alloc = FrameAllocator::new(Policy::RoundRobin);
        let mut tlb = Tlb::new();
        root(&mut mem);

        let data = alloc.allocate(&mut mem, &mut tlb, false, 0).unwrap().pfn();
        install(&mut mem, &mut alloc, &mut tlb, Vpn::new(0x020), data, 0).unwrap();

        assert_eq!(walk(&mem, Vpn::new(0x020)), Some(data));
    }

    #[test]
    fn install_twice_for_same_vpn_is_an_invariant_violation() {
        let mut mem = PhysicalMemory::new();
        let mut alloc = FrameAllocator::new(Policy::RoundRobin);
        let mut tlb = Tlb::new();
        root(&mut mem);

        let data = alloc.allocate(&mut mem, &mut tlb, false, 0).unwrap().pfn();
        install(&mut mem, &mut alloc, &mut tlb, Vpn::new(0x020), data, 0).unwrap();
        let data2 = alloc.allocate(&mut mem, &mut tlb, false, 0).unwrap().pfn();
        let result = install(&mut mem, &mut alloc, &mut tlb, Vpn::new(0x020), data2, 0);
        assert!(matches!(result, Err(SimError::LeafAlreadyPresent { .. })));
    }
}

//! Invalidation protocol (C8): keeps the TLB and the page table coherent
//! whenever the frame allocator reclaims a live frame.

use crate::address::Pfn;
use crate::error::SimError;
use crate::memory::PhysicalMemory;
use crate::page_table;
use crate::tlb::Tlb;

/// Clears the TLB entry and leaf PTE that used to map `victim`'s frame.
///
/// Must run *before* the allocator overwrites `victim`'s frame metadata,
/// since it reads `vpn_mapped` to know what to clear. A frame with no
/// mapping recorded (a directory, or a data frame that was never installed)
/// has nothing to invalidate and this is a no-op.
pub fn invalidate(mem: &mut PhysicalMemory, tlb: &mut Tlb, victim: Pfn) -> Result<(), SimError> {
    let Some(vpn) = mem.frame(victim).vpn_mapped else {
        return Ok(());
    };

    tlb.invalidate_vpn(vpn);

    match page_table::clear_leaf(mem, vpn) {
        Some(()) => Ok(()),
        None => {
            log::warn!(
                "invalidation for pfn=0x{:02x} could not reach its leaf entry (vpn=0x{:03x})",
                victim.as_u8(),
                vpn.as_u16()
            );
            if cfg!(debug_assertions) {
                Err(SimError::UnreachableDuringInvalidation {
                    victim: victim.as_u8(),
                    vpn: vpn.as_u16(),
                })
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Vpn;
    use crate::frame_alloc::FrameAllocator;
    use crate::params::ROOT_PD_PFN;
    use crate::policy::Policy;

    #[test]
    fn invalidate_clears_tlb_and_leaf() {
        let mut mem = PhysicalMemory::new();
        let mut alloc = FrameAllocator::new(Policy::RoundRobin);
        let mut tlb = Tlb::new();
        mem.frame_mut(Pfn::new(ROOT_PD_PFN)).allocated = true;
        mem.frame_mut(Pfn::new(ROOT_PD_PFN)).is_page_table = true;

        let vpn = Vpn::new(0x020);
        let data = alloc.allocate(&mut mem, &mut tlb, false, 0).unwrap().pfn();
        page_table::install(&mut mem, &mut alloc, &mut tlb, vpn, data, 0).unwrap();
        tlb.install(vpn, data, 0, Policy::RoundRobin);

        invalidate(&mut mem, &mut tlb, data).unwrap();

        assert_eq!(tlb.lookup(vpn), None);
        assert_eq!(page_table::walk(&mem, vpn), None);
    }

    #[test]
    fn invalidate_is_noop_for_unmapped_frame() {
        let mut mem = PhysicalMemory::new();
        let mut tlb = Tlb::new();
        let pfn = Pfn::new(10);
        mem.frame_mut(pfn).allocated = true;
        assert!(invalidate(&mut mem, &mut tlb, pfn).is_ok());
    }

    #[test]
    fn invalidate_reports_unreachable_leaf_in_debug_builds() {
        let mut mem = PhysicalMemory::new();
        let mut tlb = Tlb::new();
        let pfn = Pfn::new(10);
        // A mapping is recorded but the directories were never wired up, so
        // the leaf can't actually be reached: an invariant violation.
        mem.frame_mut(pfn).allocated = true;
        mem.frame_mut(pfn).vpn_mapped = Some(Vpn::new(0x020));

        let result = invalidate(&mut mem, &mut tlb, pfn);
        if cfg!(debug_assertions) {
            assert!(matches!(
                result,
                Err(SimError::UnreachableDuringInvalidation { .. })
            ));
        } else {
            assert!(result.is_ok());
        }
    }
}

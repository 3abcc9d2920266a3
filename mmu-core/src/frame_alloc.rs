//! Frame allocator with policy-driven eviction (C4).

use crate::address::Pfn;
use crate::error::SimError;
use crate::invalidate;
use crate::memory::PhysicalMemory;
use crate::params::{FIRST_DATA_PFN, NUM_FRAMES};
use crate::policy::Policy;
use crate::tlb::Tlb;

/// Hands out physical frames, falling back to eviction once the pool of
/// never-used frames is exhausted.
///
/// Eviction never touches PFNs below [`FIRST_DATA_PFN`] and never selects a
/// frame with `is_page_table` set; both are enforced in [`Self::select_victim`].
pub struct FrameAllocator {
    policy: Policy,
    next_free: u16,
    next_rr_candidate: u8,
}

/// Outcome of [`FrameAllocator::allocate`]: whether the returned frame was
/// freshly carved out of the unused pool, or reclaimed from a live mapping.
/// By the time this is returned the invalidator has already run against the
/// victim in the `Evicted` case, so callers never need to invalidate twice.
#[derive(Debug, Copy, Clone)]
pub enum Allocation {
    Fresh(Pfn),
    Evicted(Pfn),
}

impl Allocation {
    #[must_use]
    pub const fn pfn(&self) -> Pfn {
        match self {
            Self::Fresh(pfn) | Self::Evicted(pfn) => *pfn,
        }
    }
}

impl FrameAllocator {
    #[must_use]
    pub const fn new(policy: Policy) -> Self {
        Self {
            policy,
            next_free: FIRST_DATA_PFN as u16,
            next_rr_candidate: FIRST_DATA_PFN,
        }
    }

    /// Allocates a frame, marking it in `mem` with `is_page_table` and the
    /// current `tick`. When the pool of unused frames is exhausted this
    /// evicts a victim and invalidates its old mapping in `tlb` and in the
    /// page table before handing it back.
    pub fn allocate(
        &mut self,
        mem: &mut PhysicalMemory,
        tlb: &mut Tlb,
        is_page_table: bool,
        tick: u64,
    ) -> Result<Allocation, SimError> {
        let allocation = if (self.next_free as usize) < NUM_FRAMES {
            let pfn = Pfn::new(self.next_free as u8);
            self.next_free += 1;
            Allocation::Fresh(pfn)
        } else {
            let victim = self.select_victim(mem)?;
            invalidate::invalidate(mem, tlb, victim)?;
            Allocation::Evicted(victim)
        };

        let meta = mem.frame_mut(allocation.pfn());
        meta.allocated = true;
        meta.is_page_table = is_page_table;
        meta.last_access_time = Some(tick);
        meta.vpn_mapped = None;
        Ok(allocation)
    }

    fn is_evictable(mem: &PhysicalMemory, pfn: u8) -> bool {
        if (pfn as usize) < FIRST_DATA_PFN as usize {
            return false;
        }
        let meta = mem.frame(Pfn::new(pfn));
        meta.allocated && !meta.is_page_table
    }

    fn select_victim(&mut self, mem: &PhysicalMemory) -> Result<Pfn, SimError> {
        match self.policy {
            Policy::RoundRobin => self.select_round_robin(mem),
            Policy::Lru => Self::select_lru(mem),
        }
        .ok_or(SimError::NoEvictableFrame { total: NUM_FRAMES })
    }

    fn select_round_robin(&mut self, mem: &PhysicalMemory) -> Option<Pfn> {
        for step in 0..NUM_FRAMES {
            let candidate = (self.next_rr_candidate as usize + step) % NUM_FRAMES;
            if Self::is_evictable(mem, candidate as u8) {
                self.next_rr_candidate = ((candidate + 1) % NUM_FRAMES) as u8;
                return Some(Pfn::new(candidate as u8));
            }
        }
        None
    }

    fn select_lru(mem: &PhysicalMemory) -> Option<Pfn> {
        (FIRST_DATA_PFN as usize..NUM_FRAMES)
            .filter(|&pfn| Self::is_evictable(mem, pfn as u8))
            .min_by_key(|&pfn| (mem.frame(Pfn::new(pfn as u8)).last_access_time, pfn))
            .map(|pfn| Pfn::new(pfn as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlb::Tlb;

    #[test]
    fn fresh_allocation_advances_cursor() {
        let mut alloc = FrameAllocator::new(Policy::RoundRobin);
        let mut mem = PhysicalMemory::new();
        let mut tlb = Tlb::new();
        let a = alloc.allocate(&mut mem, &mut tlb, false, 0).unwrap();
        let b = alloc.allocate(&mut mem, &mut tlb, false, 0).unwrap();
        assert_ne!(a.pfn(), b.pfn());
    }

    #[test]
    fn round_robin_skips_page_table_frames() {
        let mut alloc = FrameAllocator::new(Policy::RoundRobin);
        let mut mem = PhysicalMemory::new();
        let mut tlb = Tlb::new();
        for _ in FIRST_DATA_PFN as usize..NUM_FRAMES {
            alloc.allocate(&mut mem, &mut tlb, true, 0).unwrap();
        }
        let err = alloc.allocate(&mut mem, &mut tlb, false, 1).unwrap_err();
        assert!(matches!(err, SimError::NoEvictableFrame { .. }));
    }

    #[test]
    fn lru_selects_oldest_eligible_frame() {
        let mut mem = PhysicalMemory::new();
        let mut tlb = Tlb::new();
        let mut alloc = FrameAllocator::new(Policy::Lru);
        for t in 0..(NUM_FRAMES - FIRST_DATA_PFN as usize) {
            alloc.allocate(&mut mem, &mut tlb, false, t as u64).unwrap();
        }
        let evicted = alloc.allocate(&mut mem, &mut tlb, false, 999).unwrap();
        match evicted {
            Allocation::Evicted(pfn) => assert_eq!(pfn, Pfn::new(FIRST_DATA_PFN)),
            Allocation::Fresh(_) => panic!("expected eviction once the pool is exhausted"),
        }
    }
}

//! Fully-associative TLB with policy-driven replacement (C5).

use crate::address::{Pfn, Vpn};
use crate::params::TLB_SIZE;
use crate::policy::Policy;

#[derive(Debug, Copy, Clone, Default)]
struct Entry {
    vpn: Vpn,
    pfn: Pfn,
    valid: bool,
    last_access_time: u64,
}

/// The 16-entry fully-associative translation look-aside buffer.
pub struct Tlb {
    entries: [Entry; TLB_SIZE],
    next_rr_slot: usize,
}

impl Tlb {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: [Entry::default(); TLB_SIZE],
            next_rr_slot: 0,
        }
    }

    /// Looks up `vpn`, returning its mapped frame on a hit.
    #[must_use]
    pub fn lookup(&self, vpn: Vpn) -> Option<Pfn> {
        self.entries
            .iter()
            .find(|e| e.valid && e.vpn == vpn)
            .map(|e| e.pfn)
    }

    /// Refreshes the access time of the entry mapping `vpn`, if present.
    /// Used on an LRU hit; a no-op under round-robin.
    pub fn touch(&mut self, vpn: Vpn, tick: u64) {
        if let Some(e) = self.entries.iter_mut().find(|e| e.valid && e.vpn == vpn) {
            e.last_access_time = tick;
        }
    }

    /// Installs a `vpn -> pfn` mapping, selecting a victim slot per `policy`.
    pub fn install(&mut self, vpn: Vpn, pfn: Pfn, tick: u64, policy: Policy) {
        let slot = match policy {
            Policy::RoundRobin => {
                let slot = self.next_rr_slot;
                self.next_rr_slot = (self.next_rr_slot + 1) % TLB_SIZE;
                slot
            }
            Policy::Lru => self.lru_victim_slot(),
        };
        self.entries[slot] = Entry {
            vpn,
            pfn,
            valid: true,
            last_access_time: tick,
        };
    }

    fn lru_victim_slot(&self) -> usize {
        if let Some(idx) = self.entries.iter().position(|e| !e.valid) {
            return idx;
        }
        let mut best = 0;
        let mut best_time = self.entries[0].last_access_time;
        for (idx, e) in self.entries.iter().enumerate().skip(1) {
            if e.last_access_time < best_time {
                best = idx;
                best_time = e.last_access_time;
            }
        }
        best
    }

    /// Invalidates any entry mapping `vpn`, part of the invalidation protocol (C8).
    pub fn invalidate_vpn(&mut self, vpn: Vpn) {
        for e in &mut self.entries {
            if e.valid && e.vpn == vpn {
                e.valid = false;
            }
        }
    }
}

impl Default for Tlb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_misses_on_fresh_tlb() {
        let tlb = Tlb::new();
        assert_eq!(tlb.lookup(Vpn::new(1)), None);
    }

    #[test]
    fn install_then_lookup_hits() {
        let mut tlb = Tlb::new();
        tlb.install(Vpn::new(3), Pfn::new(9), 0, Policy::RoundRobin);
        assert_eq!(tlb.lookup(Vpn::new(3)), Some(Pfn::new(9)));
    }

    #[test]
    fn round_robin_cycles_through_slots() {
        let mut tlb = Tlb::new();
        for i in 0..TLB_SIZE as u16 {
            tlb.install(Vpn::new(i), Pfn::new(i as u8), 0, Policy::RoundRobin);
        }
        // Installing one more entry must evict slot 0 (vpn 0), not any other.
        tlb.install(Vpn::new(100), Pfn::new(50), 0, Policy::RoundRobin);
        assert_eq!(tlb.lookup(Vpn::new(0)), None);
        assert_eq!(tlb.lookup(Vpn::new(1)), Some(Pfn::new(1)));
    }

    #[test]
    fn lru_prefers_least_recently_touched() {
        let mut tlb = Tlb::new();
        for i in 0..TLB_SIZE as u16 {
            tlb.install(Vpn::new(i), Pfn::new(i as u8), i as u64, Policy::Lru);
        }
        // Touch vpn 0 at a later tick so vpn 1 becomes the oldest.
        tlb.touch(Vpn::new(0), 100);
        tlb.install(Vpn::new(200), Pfn::new(60), 101, Policy::Lru);
        assert_eq!(tlb.lookup(Vpn::new(1)), None);
        assert_eq!(tlb.lookup(Vpn::new(0)), Some(Pfn::new(0)));
    }

    #[test]
    fn invalidate_vpn_clears_matching_entry() {
        let mut tlb = Tlb::new();
        tlb.install(Vpn::new(3), Pfn::new(9), 0, Policy::RoundRobin);
        tlb.invalidate_vpn(Vpn::new(3));
        assert_eq!(tlb.lookup(Vpn::new(3)), None);
    }
}

//! Top-level translation engine (C7): sequences TLB lookup, page-table walk,
//! allocation, and update steps for one virtual address, emitting events in
//! the exact order described for the per-access state machine.
//!
//! The source material expresses a page-table-miss re-access as a literal
//! recursive call into the same translation routine. Here it is flattened
//! into two explicit phases instead: [`Simulator::ensure_resident`] does
//! whatever walking/allocating/installing is required to get `vpn` into the
//! TLB, reporting whether it was already resident; [`Simulator::translate`]
//! then emits the (possibly repeated) `Access VA` / `TLB Hit` / `PA` tail.
//! Observable events are identical to a literal recursive walk; there is no
//! unbounded call stack.

use crate::address::{PhysAddr, Pfn, VirtAddr, Vpn};
use crate::error::SimError;
use crate::event::{Event, EventSink};
use crate::frame_alloc::{Allocation, FrameAllocator};
use crate::memory::PhysicalMemory;
use crate::page_table;
use crate::params::ROOT_PD_PFN;
use crate::policy::Policy;
use crate::tlb::Tlb;

/// Owns all simulator state: physical memory, the frame table embedded in
/// it, the TLB, the frame allocator, the active policy, and the global
/// tick. A fresh instance models a cold machine with an empty page table.
pub struct Simulator {
    mem: PhysicalMemory,
    tlb: Tlb,
    alloc: FrameAllocator,
    policy: Policy,
    tick: u64,
}

/// Whether [`Simulator::ensure_resident`] found `vpn` already in the TLB, or
/// had to walk/allocate/install it.
enum Resident {
    AlreadyInTlb(Pfn),
    JustInstalled(Pfn),
}

impl Simulator {
    /// Builds a cold machine: frames 0, 1, and [`ROOT_PD_PFN`] are reserved,
    /// the root directory frame is zeroed, and the tick starts at zero.
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        let mut mem = PhysicalMemory::new();
        for pfn in 0..=ROOT_PD_PFN {
            let meta = mem.frame_mut(Pfn::new(pfn));
            meta.allocated = true;
            meta.is_page_table = pfn == ROOT_PD_PFN;
        }

        Self {
            mem,
            tlb: Tlb::new(),
            alloc: FrameAllocator::new(policy),
            policy,
            tick: 0,
        }
    }

    /// Translates one virtual address, emitting its full event sequence to
    /// `sink` and advancing the global tick by exactly one (§5).
    pub fn translate(
        &mut self,
        va: VirtAddr,
        sink: &mut impl EventSink,
    ) -> Result<PhysAddr, SimError> {
        sink.emit(Event::AccessVa { va: va.as_u16() });

        let (vpn, offset) = va.split();
        let pfn = match self.ensure_resident(vpn, sink)? {
            Resident::AlreadyInTlb(pfn) => pfn,
            Resident::JustInstalled(pfn) => {
                // The re-access: the entry is now resident, so this always
                // hits.
                sink.emit(Event::AccessVa { va: va.as_u16() });
                sink.emit(Event::TlbHit {
                    vpn: vpn.as_u16(),
                    pfn: pfn.as_u8(),
                });
                pfn
            }
        };

        let pa = PhysAddr::compose(pfn, offset);
        sink.emit(Event::Pa { pa: pa.as_u16() });
        self.tick += 1;
        Ok(pa)
    }

    /// Ensures `vpn` has a valid mapping, walking and/or installing it into
    /// both the page table and the TLB as needed. Emits every event up to
    /// (but not including) the tail `Access VA` / `TLB Hit` pair that only
    /// applies once an install just happened.
    fn ensure_resident(
        &mut self,
        vpn: Vpn,
        sink: &mut impl EventSink,
    ) -> Result<Resident, SimError> {
        if let Some(pfn) = self.tlb.lookup(vpn) {
            sink.emit(Event::TlbHit {
                vpn: vpn.as_u16(),
                pfn: pfn.as_u8(),
            });
            if self.policy == Policy::Lru {
                self.tlb.touch(vpn, self.tick);
                self.mem.frame_mut(pfn).last_access_time = Some(self.tick);
            }
            return Ok(Resident::AlreadyInTlb(pfn));
        }

        sink.emit(Event::TlbMiss { vpn: vpn.as_u16() });

        if let Some(pfn) = page_table::walk(&self.mem, vpn) {
            sink.emit(Event::PageTableHit {
                vpn: vpn.as_u16(),
                pfn: pfn.as_u8(),
            });
            if self.policy == Policy::Lru {
                self.mem.frame_mut(pfn).last_access_time = Some(self.tick);
            }
            sink.emit(Event::TlbUpdate {
                vpn: vpn.as_u16(),
                pfn: pfn.as_u8(),
            });
            self.tlb.install(vpn, pfn, self.tick, self.policy);
            return Ok(Resident::JustInstalled(pfn));
        }

        sink.emit(Event::PageTableMiss { vpn: vpn.as_u16() });

        let allocation = self
            .alloc
            .allocate(&mut self.mem, &mut self.tlb, false, self.tick)?;
        let data_pfn = allocation.pfn();
        if let Allocation::Evicted(victim) = allocation {
            log::debug!(
                "evicted pfn=0x{:02x} (policy={:?}) for new data frame",
                victim.as_u8(),
                self.policy
            );
        }

        sink.emit(Event::PageTableUpdate {
            vpn: vpn.as_u16(),
            pfn: data_pfn.as_u8(),
        });

        let outcome = page_table::install(
            &mut self.mem,
            &mut self.alloc,
            &mut self.tlb,
            vpn,
            data_pfn,
            self.tick,
        )?;
        for victim in outcome.evicted {
            log::debug!(
                "evicted pfn=0x{:02x} (policy={:?}) for new directory frame",
                victim.as_u8(),
                self.policy
            );
        }

        sink.emit(Event::TlbUpdate {
            vpn: vpn.as_u16(),
            pfn: data_pfn.as_u8(),
        });
        self.tlb.install(vpn, data_pfn, self.tick, self.policy);

        Ok(Resident::JustInstalled(data_pfn))
    }
}

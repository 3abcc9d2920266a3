//! Replacement policy selection, shared by the TLB (C5) and the frame
//! allocator (C4) so eviction behaves identically in both places.

/// The two replacement disciplines a run can be configured with.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Policy {
    /// Round-robin: sweep candidates in a fixed cyclic order.
    RoundRobin,
    /// Least-recently-used: evict the candidate with the oldest access tick.
    Lru,
}

impl core::str::FromStr for Policy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RR" => Ok(Self::RoundRobin),
            "LRU" => Ok(Self::Lru),
            _ => Err(()),
        }
    }
}

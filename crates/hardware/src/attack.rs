//! Prime+Probe eviction-set discovery against the randomized LLC.
//!
//! The miss depth returned by [`Controller::access`] is a side channel:
//! depth 3 means the line was nowhere in the hierarchy, so an attacker
//! can learn which of its own addresses were pushed out of the LLC. This
//! module drives that channel through the classic protocol:
//! 1. **Prime:** Access a candidate pool twice the LLC's capacity.
//! 2. **Prune:** Re-access in reverse order, keeping only lines still
//!    resident; the survivors approximate the LLC's contents.
//! 3. **Refill + install:** Restore the survivors, then touch the target
//!    line so it lands in its (secret) LLC set.
//! 4. **Probe:** Re-access the survivors; those that now miss collide
//!    with the target's set under the index scrambler and form the
//!    eviction set.
//!
//! Everything is deterministic for a fixed candidate seed, so a
//! discovered set is reproducible run to run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::addr::{PhysAddr, LINE_ADDR_BITS, LINE_OFFSET_BITS};
use crate::hierarchy::{Controller, LevelId};

/// A set of addresses that collectively evict a target line from the LLC.
#[derive(Clone, Debug)]
pub struct EvictionSet {
    /// The victim address the set was built for.
    pub target: PhysAddr,
    /// Word-granularity member addresses, in discovery order.
    pub members: Vec<PhysAddr>,
}

/// Samples candidate line addresses uniformly from `[1, 2^40)`.
///
/// Returned addresses are word-granularity (line shifted up by the line
/// offset). Line 0 is excluded so the pool never aliases the
/// conventional target.
pub fn generate_candidates(seed: u64, count: usize) -> Vec<PhysAddr> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let line = rng.gen_range(1..1u64 << LINE_ADDR_BITS);
            PhysAddr::new(line << LINE_OFFSET_BITS)
        })
        .collect()
}

/// Runs the discovery protocol and returns the eviction set for `target`.
///
/// The candidate pool holds `2 × sets × ways` lines of the controller's
/// LLC. The controller's cache state is consumed by the protocol; callers
/// wanting a pristine hierarchy afterward should use a fresh controller.
pub fn discover(ctrl: &mut Controller, target: PhysAddr, candidate_seed: u64) -> EvictionSet {
    let memory = ctrl.depth_to_memory();
    let llc = ctrl.level(LevelId::Llc);
    let pool = 2 * llc.sets() * llc.ways();

    let candidates = generate_candidates(candidate_seed, pool);

    // Prime: pull every candidate through the hierarchy once.
    for &addr in &candidates {
        ctrl.access(addr);
    }

    // Prune in reverse order; what still hits somewhere is what the
    // hierarchy actually retained.
    let mut survivors: Vec<PhysAddr> = candidates
        .iter()
        .rev()
        .copied()
        .filter(|&addr| ctrl.access(addr) < memory)
        .collect();
    survivors.reverse();

    // Refill in original order, then install the target.
    for &addr in &survivors {
        ctrl.access(addr);
    }
    ctrl.access(target);

    // Probe: survivors that now miss to memory share the target's LLC set.
    let members = survivors
        .iter()
        .copied()
        .filter(|&addr| ctrl.access(addr) == memory)
        .collect();

    EvictionSet { target, members }
}

/// Checks that the set actually evicts its target.
///
/// Re-installs the target, walks the members in series, and demands the
/// target then miss to memory; finally every member, re-accessed in
/// series, must miss as well (the set and the target keep displacing one
/// another in the contested LLC set).
pub fn verify(ctrl: &mut Controller, set: &EvictionSet) -> bool {
    let memory = ctrl.depth_to_memory();

    ctrl.access(set.target);
    for &addr in &set.members {
        ctrl.access(addr);
    }

    if ctrl.access(set.target) != memory {
        return false;
    }

    set.members.iter().all(|&addr| ctrl.access(addr) == memory)
}

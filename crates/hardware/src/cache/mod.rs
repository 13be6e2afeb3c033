//! Set-associative cache level with true-LRU replacement.
//!
//! This module implements one level of the hierarchy as a tag store over
//! `2^set_bits` sets of `2^way_bits` ways. Replacement is true LRU kept as
//! dense per-slot ages: within a set the valid slots' ages are always a
//! permutation of `{0..V-1}` where `V` is the number of valid slots, with
//! age 0 the most recently used and age `V-1` the eviction victim.
//!
//! A level only performs local operations (lookup, fill, invalidate).
//! Miss propagation toward memory and inclusive back-invalidation toward
//! the core are orchestrated by the hierarchy controller, which composes
//! these operations across levels.

use crate::config::CacheConfig;

/// One tag-store entry: validity, tag, and LRU age.
///
/// Tag and age are meaningful only while `valid` is set.
#[derive(Clone, Default)]
struct CacheSlot {
    tag: u64,
    valid: bool,
    age: u8,
}

/// One set-associative level of the cache hierarchy.
///
/// Slots live in a single flat vector indexed `set * ways + way`.
pub struct CacheLevel {
    slots: Vec<CacheSlot>,
    set_bits: u32,
    sets: usize,
    ways: usize,
    set_mask: u64,
}

impl CacheLevel {
    /// Creates an empty (all-invalid) level with the given geometry.
    ///
    /// Geometry is assumed validated; see [`CacheConfig::validate`].
    pub fn new(config: &CacheConfig) -> Self {
        let sets = 1usize << config.set_bits;
        let ways = 1usize << config.way_bits;

        Self {
            slots: vec![CacheSlot::default(); sets * ways],
            set_bits: config.set_bits,
            sets,
            ways,
            set_mask: (sets as u64) - 1,
        }
    }

    /// Number of sets.
    #[inline(always)]
    pub fn sets(&self) -> usize {
        self.sets
    }

    /// Associativity.
    #[inline(always)]
    pub fn ways(&self) -> usize {
        self.ways
    }

    /// Set index of a line address at this level.
    #[inline(always)]
    pub fn set_of(&self, line: u64) -> usize {
        (line & self.set_mask) as usize
    }

    /// Tag of a line address at this level.
    #[inline(always)]
    pub fn tag_of(&self, line: u64) -> u64 {
        line >> self.set_bits
    }

    /// Reassembles a line address from a set index and a tag.
    #[inline(always)]
    fn line_of(&self, set: usize, tag: u64) -> u64 {
        (tag << self.set_bits) | set as u64
    }

    /// Way holding the line, if it is resident.
    fn way_of(&self, set: usize, tag: u64) -> Option<usize> {
        let base = set * self.ways;
        (0..self.ways).find(|&w| {
            let slot = &self.slots[base + w];
            slot.valid && slot.tag == tag
        })
    }

    /// Looks up a line and, on a hit, promotes it to most recently used.
    ///
    /// Promotion re-densifies the ages: every valid slot that was younger
    /// than the hit slot ages by one, and the hit slot moves to age 0, so
    /// the set's ages remain a dense permutation. A miss leaves the level
    /// untouched.
    ///
    /// # Returns
    ///
    /// `true` on a hit, `false` on a miss.
    pub fn touch(&mut self, line: u64) -> bool {
        let set = self.set_of(line);
        let tag = self.tag_of(line);
        let base = set * self.ways;

        let Some(way) = self.way_of(set, tag) else {
            return false;
        };

        let old_age = self.slots[base + way].age;
        if old_age != 0 {
            for w in 0..self.ways {
                let slot = &mut self.slots[base + w];
                if slot.valid && slot.age < old_age {
                    slot.age += 1;
                }
            }
            self.slots[base + way].age = 0;
        }
        true
    }

    /// Returns `true` when the line is resident, without touching LRU state.
    pub fn contains_line(&self, line: u64) -> bool {
        self.way_of(self.set_of(line), self.tag_of(line)).is_some()
    }

    /// First invalid way in the set, if any.
    pub fn free_way(&self, set: usize) -> Option<usize> {
        let base = set * self.ways;
        (0..self.ways).find(|&w| !self.slots[base + w].valid)
    }

    /// Line address of the LRU victim in a set.
    ///
    /// The caller must know the set holds at least one valid slot; the
    /// dense-age invariant makes the victim (the age-maximal slot) unique.
    pub fn lru_line(&self, set: usize) -> u64 {
        let base = set * self.ways;
        let mut victim: Option<(usize, u8)> = None;

        for w in 0..self.ways {
            let slot = &self.slots[base + w];
            if slot.valid && victim.map_or(true, |(_, age)| slot.age > age) {
                victim = Some((w, slot.age));
            }
        }

        let (way, _) = victim.expect("LRU selection on an empty set");
        self.line_of(set, self.slots[base + way].tag)
    }

    /// Installs a line into a free way of its set as the new MRU.
    ///
    /// Every valid slot in the set ages by one before the new line enters
    /// at age 0. The caller must have freed a way first (via
    /// [`Self::free_way`] / eviction of [`Self::lru_line`]).
    pub fn fill(&mut self, line: u64) {
        let set = self.set_of(line);
        let tag = self.tag_of(line);
        let base = set * self.ways;

        let way = self
            .free_way(set)
            .expect("fill requires a free way in the target set");

        for w in 0..self.ways {
            let slot = &mut self.slots[base + w];
            if slot.valid {
                slot.age += 1;
            }
        }

        self.slots[base + way] = CacheSlot {
            tag,
            valid: true,
            age: 0,
        };
    }

    /// Invalidates a line if it is resident.
    ///
    /// Ages are repaired so the set's valid slots stay densely numbered:
    /// every slot older than the removed one becomes one step younger.
    ///
    /// # Returns
    ///
    /// `true` when the line was present and has been removed; `false`
    /// (with no state change) when it was absent. Absence is not an
    /// error: inclusive back-invalidation legitimately reaches levels
    /// that no longer hold the line.
    pub fn invalidate(&mut self, line: u64) -> bool {
        let set = self.set_of(line);
        let tag = self.tag_of(line);
        let base = set * self.ways;

        let Some(way) = self.way_of(set, tag) else {
            return false;
        };

        let old_age = self.slots[base + way].age;
        self.slots[base + way].valid = false;

        for w in 0..self.ways {
            let slot = &mut self.slots[base + w];
            if slot.valid && slot.age > old_age {
                slot.age -= 1;
            }
        }
        true
    }

    /// Line addresses of every valid slot, in set order.
    ///
    /// Intended for occupancy inspection and invariant checking; the
    /// addresses are in this level's own (storage) address space.
    pub fn valid_lines(&self) -> Vec<u64> {
        let mut lines = Vec::new();
        for set in 0..self.sets {
            let base = set * self.ways;
            for w in 0..self.ways {
                let slot = &self.slots[base + w];
                if slot.valid {
                    lines.push(self.line_of(set, slot.tag));
                }
            }
        }
        lines
    }

    /// Ages of the valid slots in one set, in way order.
    pub fn set_ages(&self, set: usize) -> Vec<u8> {
        let base = set * self.ways;
        (0..self.ways)
            .filter(|&w| self.slots[base + w].valid)
            .map(|w| self.slots[base + w].age)
            .collect()
    }
}

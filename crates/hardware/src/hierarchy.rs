//! Inclusive multi-level cache hierarchy controller.
//!
//! The controller owns the cache levels and the links between them, and
//! implements the two recursive walks that define the hierarchy:
//! 1. **Miss propagation (toward memory):** An access that misses at one
//!    level consults the next level, then installs the line locally; the
//!    returned miss depth counts the levels consulted before a hit.
//! 2. **Back-invalidation (toward the core):** An eviction at one level
//!    synchronously invalidates the same line at every level closer to
//!    the core, preserving inclusion.
//! 3. **Randomized LLC boundary:** The last level carries an
//!    [`AddressScrambler`]; line addresses are scrambled on the way in
//!    and unscrambled exactly once, at this boundary, when evictions
//!    propagate back up. Upper levels only ever see physical lines.
//!
//! Levels are stored in a controller-owned vector; `next`/`prev` links
//! are stable indices into it, so the topology stays a tree without
//! owning back-references.

use crate::cache::CacheLevel;
use crate::common::addr::PhysAddr;
use crate::common::ConfigError;
use crate::config::Config;
use crate::scramble::AddressScrambler;
use crate::stats::AccessStats;

/// Index of the level closest to the core; all accesses enter here.
const ROOT: usize = 0;

/// Identifies one level of the fixed three-level topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelId {
    /// L1 data cache.
    L1d,
    /// L2 data cache.
    L2d,
    /// Randomized last-level cache.
    Llc,
}

impl LevelId {
    #[inline(always)]
    fn index(self) -> usize {
        match self {
            LevelId::L1d => 0,
            LevelId::L2d => 1,
            LevelId::Llc => 2,
        }
    }
}

/// One node of the topology: a cache level plus its links.
///
/// `scrambler` is present only on the randomized LLC; when set, the
/// level's storage works in scrambled line-address space.
struct LevelNode {
    cache: CacheLevel,
    scrambler: Option<AddressScrambler>,
    next: Option<usize>,
    prev: Vec<usize>,
}

/// The three-level inclusive hierarchy: L1D → L2D → randomized LLC.
pub struct Controller {
    levels: Vec<LevelNode>,
    /// Per-level hit counters, updated on every access.
    pub stats: AccessStats,
}

impl Controller {
    /// Builds the built-in hierarchy: L1D 256×8, L2D 1024×16, and a
    /// randomized LLC of 2048×32 with seed 0 and keys {100, 200, 300,
    /// 400}.
    pub fn new() -> Self {
        match Self::from_config(&Config::default()) {
            Ok(controller) => controller,
            Err(e) => unreachable!("built-in configuration rejected: {}", e),
        }
    }

    /// Builds a hierarchy from an explicit configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when a level's geometry is out of range or the LLC
    /// key vector is malformed.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.l1d.validate()?;
        config.l2d.validate()?;
        config.llc.geometry().validate()?;

        let scrambler = AddressScrambler::new(config.llc.seed, &config.llc.keys)?;

        let levels = vec![
            LevelNode {
                cache: CacheLevel::new(&config.l1d),
                scrambler: None,
                next: Some(1),
                prev: Vec::new(),
            },
            LevelNode {
                cache: CacheLevel::new(&config.l2d),
                scrambler: None,
                next: Some(2),
                prev: vec![0],
            },
            LevelNode {
                cache: CacheLevel::new(&config.llc.geometry()),
                scrambler: Some(scrambler),
                next: None,
                prev: vec![1],
            },
        ];

        Ok(Self {
            levels,
            stats: AccessStats::default(),
        })
    }

    /// Simulates one memory access and returns its miss depth.
    ///
    /// Depth 0 is an L1D hit, 1 an L2D hit, 2 an LLC hit, and 3 a miss
    /// all the way to main memory. The line is resident at every level
    /// when the call returns.
    ///
    /// # Panics
    ///
    /// Panics when the address has bits set above the 46-bit physical
    /// space; that is a caller bug, not a simulatable event.
    pub fn access(&mut self, addr: PhysAddr) -> u32 {
        assert!(
            addr.is_valid(),
            "address {:#x} exceeds the 46-bit physical space",
            addr.val()
        );

        let depth = self.access_at(ROOT, addr.line());
        self.stats.record(depth);
        depth
    }

    /// Invalidates a line at one level and back-invalidates upward.
    ///
    /// The line address is interpreted in the level's own storage space:
    /// for the LLC that is a scrambled line address. Invalidating a line
    /// that is not present is a silent no-op.
    pub fn evict_line(&mut self, level: LevelId, line: u64) {
        self.evict_at(level.index(), line);
    }

    /// Read access to one level's storage, for inspection.
    pub fn level(&self, level: LevelId) -> &CacheLevel {
        &self.levels[level.index()].cache
    }

    /// The LLC's index scrambler.
    pub fn llc_scrambler(&self) -> &AddressScrambler {
        self.levels[LevelId::Llc.index()]
            .scrambler
            .as_ref()
            .expect("the LLC always carries a scrambler")
    }

    /// Miss depth reported for an access that reaches main memory.
    ///
    /// Equals the number of levels on the chain from the root, so 3 for
    /// the built-in topology.
    pub fn depth_to_memory(&self) -> u32 {
        let mut depth = 0;
        let mut node = Some(ROOT);
        while let Some(idx) = node {
            depth += 1;
            node = self.levels[idx].next;
        }
        depth
    }

    /// Recursive access walk from level `idx` downward.
    ///
    /// The incoming line address is in the caller's space; a scrambled
    /// level transforms it once on entry and works in its own space from
    /// there on.
    fn access_at(&mut self, idx: usize, line: u64) -> u32 {
        let local = match &self.levels[idx].scrambler {
            Some(phi) => phi.encrypt(line),
            None => line,
        };

        if self.levels[idx].cache.touch(local) {
            return 0;
        }

        let depth = match self.levels[idx].next {
            Some(next) => 1 + self.access_at(next, local),
            None => 1,
        };

        self.insert_at(idx, local);
        depth
    }

    /// Installs a line at level `idx`, evicting the LRU victim first when
    /// the set is full. The eviction runs through the full inclusive
    /// path, so upper levels drop the victim before the new line lands.
    fn insert_at(&mut self, idx: usize, line: u64) {
        let set = self.levels[idx].cache.set_of(line);
        if self.levels[idx].cache.free_way(set).is_none() {
            let victim = self.levels[idx].cache.lru_line(set);
            self.evict_at(idx, victim);
        }
        self.levels[idx].cache.fill(line);
    }

    /// Recursive eviction walk from level `idx` toward the core.
    ///
    /// The unscramble happens here and only here: a scrambled level
    /// translates the evicted line back to its physical form before
    /// telling the levels above, because they store physical lines.
    fn evict_at(&mut self, idx: usize, line: u64) {
        if !self.levels[idx].cache.invalidate(line) {
            return;
        }

        let upstream = match &self.levels[idx].scrambler {
            Some(phi) => phi.decrypt(line),
            None => line,
        };

        let prev = self.levels[idx].prev.clone();
        for p in prev {
            self.evict_at(p, upstream);
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

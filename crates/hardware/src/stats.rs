//! Access statistics for the cache hierarchy.
//!
//! Tracks where in the hierarchy each access was satisfied, derived from
//! the miss depth the controller returns: 0 = L1D hit, 1 = L2D hit,
//! 2 = LLC hit, deeper = main-memory fetch.

/// Hit counters per hierarchy level.
#[derive(Clone, Default)]
pub struct AccessStats {
    /// Total accesses observed.
    pub accesses: u64,
    /// Accesses satisfied by the L1 data cache.
    pub l1d_hits: u64,
    /// Accesses satisfied by the L2 data cache.
    pub l2d_hits: u64,
    /// Accesses satisfied by the last-level cache.
    pub llc_hits: u64,
    /// Accesses that went all the way to main memory.
    pub memory_fetches: u64,
}

impl AccessStats {
    /// Records one access by its miss depth.
    pub fn record(&mut self, depth: u32) {
        self.accesses += 1;
        match depth {
            0 => self.l1d_hits += 1,
            1 => self.l2d_hits += 1,
            2 => self.llc_hits += 1,
            _ => self.memory_fetches += 1,
        }
    }

    /// Fraction of accesses satisfied without reaching main memory.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            return 0.0;
        }
        1.0 - self.memory_fetches as f64 / self.accesses as f64
    }

    /// Prints the counters as a small report.
    pub fn print(&self) {
        println!("Accesses:       {}", self.accesses);
        println!("  L1D hits:     {}", self.l1d_hits);
        println!("  L2D hits:     {}", self.l2d_hits);
        println!("  LLC hits:     {}", self.llc_hits);
        println!("  Memory:       {}", self.memory_fetches);
        println!("  Hit rate:     {:.2}%", self.hit_rate() * 100.0);
    }
}

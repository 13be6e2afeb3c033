//! Physical address type and line-address arithmetic.
//!
//! The simulated machine uses 46-bit physical addresses over 64-word cache
//! lines: the low 6 bits select a word within a line and the remaining
//! 40 bits form the line address that the cache hierarchy operates on.
//! A strong `PhysAddr` type keeps word-granularity addresses distinct from
//! the raw line addresses that circulate inside the hierarchy.

/// Number of address bits selecting a word within a cache line.
pub const LINE_OFFSET_BITS: u32 = 6;

/// Width of a line address (physical bits above the word offset).
pub const LINE_ADDR_BITS: u32 = 40;

/// Width of a physical address.
pub const PHYS_ADDR_BITS: u32 = LINE_OFFSET_BITS + LINE_ADDR_BITS;

/// Mask selecting the word-within-line bits of a physical address.
pub const LINE_OFFSET_MASK: u64 = (1 << LINE_OFFSET_BITS) - 1;

/// Mask selecting a 40-bit line address.
pub const LINE_ADDR_MASK: u64 = (1 << LINE_ADDR_BITS) - 1;

/// A physical address in the simulated 46-bit address space.
///
/// Word-granularity: the hierarchy only ever inspects the line-address
/// portion, but the full address is carried so that traces and drivers can
/// speak in the same units the machine would.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysAddr(pub u64);

impl PhysAddr {
    /// Creates a new physical address from a raw 64-bit value.
    #[inline(always)]
    pub fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub fn val(&self) -> u64 {
        self.0
    }

    /// Extracts the 40-bit line address (bits `[6..46)`).
    #[inline(always)]
    pub fn line(&self) -> u64 {
        self.0 >> LINE_OFFSET_BITS
    }

    /// Extracts the word index within the line (low 6 bits).
    #[inline(always)]
    pub fn word_offset(&self) -> u64 {
        self.0 & LINE_OFFSET_MASK
    }

    /// Rebuilds a word-granularity address from a line address and a word
    /// index.
    pub fn from_line(line: u64, word: u64) -> Self {
        Self((line << LINE_OFFSET_BITS) | (word & LINE_OFFSET_MASK))
    }

    /// Returns `true` when the address fits the 46-bit physical space.
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.0 >> PHYS_ADDR_BITS == 0
    }
}

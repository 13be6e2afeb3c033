//! Configuration for the simulated cache hierarchy.
//!
//! This module defines the structures that parameterize the simulator:
//! 1. **Defaults:** The baseline three-level geometry (L1D, L2D, LLC) and
//!    the LLC scrambler seed and key vector.
//! 2. **Structures:** Per-level geometry plus the LLC's randomization
//!    parameters.
//!
//! Configuration deserializes from JSON; `Config::default()` reproduces
//! the built-in hierarchy used by the CLI.

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hierarchy when not explicitly
/// overridden.
mod defaults {
    /// L1 data cache: 256 sets.
    pub const L1D_SET_BITS: u32 = 8;

    /// L1 data cache: 8 ways.
    pub const L1D_WAY_BITS: u32 = 3;

    /// L2 data cache: 1024 sets.
    pub const L2D_SET_BITS: u32 = 10;

    /// L2 data cache: 16 ways.
    pub const L2D_WAY_BITS: u32 = 4;

    /// Last-level cache: 2048 sets.
    pub const LLC_SET_BITS: u32 = 11;

    /// Last-level cache: 32 ways.
    pub const LLC_WAY_BITS: u32 = 5;

    /// Seed for the LLC's S-box and P-box construction.
    pub const LLC_SEED: u64 = 0;

    /// Per-round LLC keys (masked to 20 bits at construction).
    pub const LLC_KEYS: [u64; 4] = [100, 200, 300, 400];
}

/// Geometry of one set-associative cache level.
///
/// A level has `2^set_bits` sets of `2^way_bits` ways.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CacheConfig {
    /// log2 of the number of sets.
    pub set_bits: u32,

    /// log2 of the associativity.
    pub way_bits: u32,
}

impl CacheConfig {
    /// Checks that the geometry is one the simulator can represent.
    ///
    /// Set counts are capped so the tag never degenerates, and ways are
    /// capped by the 8-bit age field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.set_bits == 0 || self.set_bits > 30 {
            return Err(ConfigError::SetBitsRange(self.set_bits));
        }
        if self.way_bits > 8 {
            return Err(ConfigError::WayBitsRange(self.way_bits));
        }
        Ok(())
    }
}

/// Configuration of the randomized last-level cache.
#[derive(Debug, Clone, Deserialize)]
pub struct LlcConfig {
    /// log2 of the number of sets.
    #[serde(default = "LlcConfig::default_set_bits")]
    pub set_bits: u32,

    /// log2 of the associativity.
    #[serde(default = "LlcConfig::default_way_bits")]
    pub way_bits: u32,

    /// Seed for the scrambler's permutation tables.
    #[serde(default)]
    pub seed: u64,

    /// Per-round scrambler keys; exactly one per cipher round.
    #[serde(default = "LlcConfig::default_keys")]
    pub keys: Vec<u64>,
}

impl LlcConfig {
    /// Returns the default LLC set count (log2).
    fn default_set_bits() -> u32 {
        defaults::LLC_SET_BITS
    }

    /// Returns the default LLC associativity (log2).
    fn default_way_bits() -> u32 {
        defaults::LLC_WAY_BITS
    }

    /// Returns the default key vector.
    fn default_keys() -> Vec<u64> {
        defaults::LLC_KEYS.to_vec()
    }

    /// The plain set-associative geometry underneath the scrambler.
    pub fn geometry(&self) -> CacheConfig {
        CacheConfig {
            set_bits: self.set_bits,
            way_bits: self.way_bits,
        }
    }
}

impl Default for LlcConfig {
    fn default() -> Self {
        Self {
            set_bits: defaults::LLC_SET_BITS,
            way_bits: defaults::LLC_WAY_BITS,
            seed: defaults::LLC_SEED,
            keys: defaults::LLC_KEYS.to_vec(),
        }
    }
}

/// Root configuration for the three-level hierarchy.
///
/// # Examples
///
/// Creating the built-in hierarchy:
///
/// ```
/// use ceaser_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.l1d.set_bits, 8);
/// assert_eq!(config.llc.way_bits, 5);
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use ceaser_core::config::Config;
///
/// let json = r#"{
///     "l1d": { "set_bits": 8, "way_bits": 3 },
///     "l2d": { "set_bits": 10, "way_bits": 4 },
///     "llc": { "set_bits": 11, "way_bits": 5, "seed": 7, "keys": [1, 2, 3, 4] }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.llc.seed, 7);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// L1 data cache geometry.
    #[serde(default = "Config::default_l1d")]
    pub l1d: CacheConfig,

    /// L2 data cache geometry.
    #[serde(default = "Config::default_l2d")]
    pub l2d: CacheConfig,

    /// Randomized last-level cache parameters.
    #[serde(default)]
    pub llc: LlcConfig,
}

impl Config {
    /// Returns the default L1D geometry.
    fn default_l1d() -> CacheConfig {
        CacheConfig {
            set_bits: defaults::L1D_SET_BITS,
            way_bits: defaults::L1D_WAY_BITS,
        }
    }

    /// Returns the default L2D geometry.
    fn default_l2d() -> CacheConfig {
        CacheConfig {
            set_bits: defaults::L2D_SET_BITS,
            way_bits: defaults::L2D_WAY_BITS,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            l1d: Self::default_l1d(),
            l2d: Self::default_l2d(),
            llc: LlcConfig::default(),
        }
    }
}

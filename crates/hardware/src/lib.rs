//! Randomized-LLC cache hierarchy simulator library.
//!
//! This crate implements a functional (hit/miss/inclusion) simulator of a
//! three-level inclusive data-cache hierarchy whose last-level cache uses
//! a randomized, encrypted-index design, plus the Prime+Probe driver that
//! attacks it:
//! 1. **Cache:** Set-associative tag stores with true-LRU replacement.
//! 2. **Hierarchy:** L1D → L2D → LLC with miss propagation down and
//!    inclusive back-invalidation up.
//! 3. **Scrambling:** A keyed, invertible 40-bit permutation applied to
//!    line addresses at the LLC boundary.
//! 4. **Attack:** Eviction-set discovery over the miss-depth side
//!    channel, with verification.
//! 5. **Simulation:** Configuration, address traces, and statistics.

/// Prime+Probe eviction-set discovery and verification.
pub mod attack;
/// Set-associative cache level with true-LRU replacement.
pub mod cache;
/// Common types (addresses, errors).
pub mod common;
/// Hierarchy configuration (defaults, per-level geometry, LLC keys).
pub mod config;
/// Hierarchy controller (topology, access, back-invalidation).
pub mod hierarchy;
/// Keyed index scrambling for the randomized LLC.
pub mod scramble;
/// Trace loading.
pub mod sim;
/// Access statistics.
pub mod stats;

/// Physical address in the simulated 46-bit address space.
pub use crate::common::addr::PhysAddr;
/// Root configuration type; use `Config::default()` for the built-in hierarchy.
pub use crate::config::Config;
/// Hierarchy controller; construct with `Controller::new` and drive with `access`.
pub use crate::hierarchy::{Controller, LevelId};

//! Simulation input utilities.
//!
//! Provides trace loading for replaying recorded address streams through
//! the hierarchy.

pub mod trace;

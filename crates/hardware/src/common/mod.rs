//! Common types shared across the simulator.
//!
//! This module provides the fundamental building blocks used by every other
//! component:
//! 1. **Address types:** The 46-bit physical address space and its
//!    line/word decomposition.
//! 2. **Error handling:** Construction and trace-loading error types.

/// Address type definitions and line-address arithmetic.
pub mod addr;

/// Error types for construction and trace loading.
pub mod error;

pub use addr::PhysAddr;
pub use error::{ConfigError, TraceError};

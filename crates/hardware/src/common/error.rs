//! Error types for hierarchy construction and trace loading.
//!
//! Two failure domains exist: a configuration can describe a hierarchy the
//! simulator cannot build (bad geometry, malformed key vector), and a trace
//! file can be unreadable or contain lines that do not parse as addresses.
//! Everything else in the simulator is infallible by construction; in
//! particular, evicting a line that is not present is defined as a silent
//! no-op, not an error.

use std::fmt;
use std::io;

/// Rejected hierarchy configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The LLC key vector did not have exactly one key per cipher round.
    ///
    /// The associated value is the number of keys supplied.
    KeyVectorLength(usize),

    /// A cache level's set count is outside the supported range.
    ///
    /// The associated value is the offending `set_bits`.
    SetBitsRange(u32),

    /// A cache level's associativity is outside the supported range.
    ///
    /// The associated value is the offending `way_bits`.
    WayBitsRange(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::KeyVectorLength(n) => {
                write!(f, "LLC key vector must hold exactly 4 keys, got {}", n)
            }
            ConfigError::SetBitsRange(bits) => {
                write!(f, "set_bits {} outside supported range 1..=30", bits)
            }
            ConfigError::WayBitsRange(bits) => {
                write!(f, "way_bits {} outside supported range 0..=8", bits)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure while loading an address trace.
#[derive(Debug)]
pub enum TraceError {
    /// The trace file could not be read.
    Io(io::Error),

    /// A non-comment line did not parse as a hex or decimal address.
    Parse {
        /// 1-based line number within the trace file.
        line: usize,
        /// The offending text, trimmed.
        text: String,
    },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io(e) => write!(f, "trace file unreadable: {}", e),
            TraceError::Parse { line, text } => {
                write!(f, "trace line {}: not an address: '{}'", line, text)
            }
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io(e) => Some(e),
            TraceError::Parse { .. } => None,
        }
    }
}

impl From<io::Error> for TraceError {
    fn from(e: io::Error) -> Self {
        TraceError::Io(e)
    }
}

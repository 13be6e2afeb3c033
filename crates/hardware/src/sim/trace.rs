//! Address-trace loading.
//!
//! A trace is a text file with one physical address per line, written in
//! hex (`0x...`) or decimal. Blank lines and lines starting with `#` are
//! skipped, so traces can carry their own commentary.

use std::fs;
use std::path::Path;

use crate::common::addr::PhysAddr;
use crate::common::TraceError;

/// Loads a trace file into a vector of physical addresses.
///
/// # Errors
///
/// [`TraceError::Io`] when the file cannot be read, or
/// [`TraceError::Parse`] naming the first line that is not an address.
pub fn load_trace<P: AsRef<Path>>(path: P) -> Result<Vec<PhysAddr>, TraceError> {
    let text = fs::read_to_string(path)?;
    let mut addrs = Vec::new();

    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parsed = match line.strip_prefix("0x").or_else(|| line.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => line.parse::<u64>(),
        };

        let value = parsed.map_err(|_| TraceError::Parse {
            line: number + 1,
            text: line.to_string(),
        })?;
        addrs.push(PhysAddr::new(value));
    }

    Ok(addrs)
}

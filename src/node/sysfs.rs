//! Plain-text sysfs control-node reads and writes.
//!
//! Control nodes carry decimal text: enable flags (0/1, or a shared bit
//! field when multiplexed through the sensorhub), intervals in nanoseconds,
//! buffer lengths. Write failures are reported as `false` so callers can
//! keep their in-memory state consistent with the last confirmed hardware
//! state.

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use log::{debug, error};

/// Read and parse a control node. Trailing whitespace/newline is tolerated.
pub fn read_node_value<T: FromStr>(path: &Path) -> Option<T> {
    let content = std::fs::read_to_string(path).ok()?;
    content.trim().parse().ok()
}

/// Write a value to a control node as decimal text.
pub fn write_node_value<T: Display>(path: &Path, value: T) -> bool {
    let text = value.to_string();
    match std::fs::write(path, &text) {
        Ok(()) => {
            debug!("wrote {} to {}", text, path.display());
            true
        }
        Err(e) => {
            error!("failed to write {} to {}: {}", text, path.display(), e);
            false
        }
    }
}

/// Toggle an enable node.
///
/// Plain device nodes take a bare 0/1. Sensorhub-multiplexed nodes share one
/// bit field across all hub features, so the current value is read back and
/// only this sensor's bit is changed.
pub fn set_enable_node(path: &Path, sensorhub_controlled: bool, enable: bool, bit: u32) -> bool {
    if !sensorhub_controlled {
        return write_node_value(path, u32::from(enable));
    }

    let current: u32 = read_node_value(path).unwrap_or(0);
    let updated = if enable {
        current | (1 << bit)
    } else {
        current & !(1 << bit)
    };
    write_node_value(path, updated)
}

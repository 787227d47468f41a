//! Input-event wire format decoding.
//!
//! Legacy kernel sensor drivers report through the input subsystem as a
//! stream of fixed-size records terminated by a synchronization record.
//! One decode call consumes records up to the sync marker and commits the
//! accumulated axis updates in a single step, so a failed decode can never
//! corrupt the previously valid sample.

use std::io::Read;

use log::{debug, error, warn};
use sensord_hal_types::RawSample;

// Kernel input-event type/code constants (linux/input-event-codes.h).
const EV_SYN: u16 = 0x00;
const EV_REL: u16 = 0x02;
const EV_ABS: u16 = 0x03;
const REL_X: u16 = 0x00;
const REL_Y: u16 = 0x01;
const REL_Z: u16 = 0x02;
const ABS_DISTANCE: u16 = 0x19;

/// Size of one `struct input_event` on 64-bit kernels.
const INPUT_EVENT_SIZE: usize = 24;

/// Bounded scan length: records consumed looking for the sync marker before
/// the decode cycle is given up as a transient failure.
pub const MAX_RECORDS_BEFORE_SYN: usize = 10;

/// Which event codes update which sample axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMap {
    /// Relative X/Y/Z axes (tri-axis motion sensors).
    TriAxisRel,
    /// Absolute distance state (proximity).
    AbsDistance,
}

/// One decoded kernel input-event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEventRecord {
    /// Kernel-provided timestamp in microseconds.
    pub time_us: u64,
    pub event_type: u16,
    pub code: u16,
    pub value: i32,
}

impl InputEventRecord {
    /// Decode the fixed little-endian kernel layout: two 64-bit timeval
    /// fields, type, code, value.
    fn parse(buf: &[u8; INPUT_EVENT_SIZE]) -> Self {
        let tv_sec = i64::from_le_bytes(buf[0..8].try_into().expect("slice len"));
        let tv_usec = i64::from_le_bytes(buf[8..16].try_into().expect("slice len"));
        let event_type = u16::from_le_bytes(buf[16..18].try_into().expect("slice len"));
        let code = u16::from_le_bytes(buf[18..20].try_into().expect("slice len"));
        let value = i32::from_le_bytes(buf[20..24].try_into().expect("slice len"));
        Self {
            time_us: (tv_sec as u64).wrapping_mul(1_000_000).wrapping_add(tv_usec as u64),
            event_type,
            code,
            value,
        }
    }
}

/// Run one input-event decode cycle.
///
/// Reads records until the sync marker, updating axes per `axes`. On sync,
/// the kernel timestamp becomes the sample's fired time and the accumulated
/// updates are committed to `sample`. Any unrecognized record, a short read,
/// or exhausting [`MAX_RECORDS_BEFORE_SYN`] records without a sync marker
/// fails the cycle and leaves `sample` untouched.
pub fn decode_input_events<R: Read>(reader: &mut R, axes: AxisMap, sample: &mut RawSample) -> bool {
    let mut scratch = *sample;
    scratch.begin_cycle();

    for _ in 0..MAX_RECORDS_BEFORE_SYN {
        let mut buf = [0u8; INPUT_EVENT_SIZE];
        if let Err(e) = reader.read_exact(&mut buf) {
            error!("input event read failed: {}", e);
            return false;
        }

        let record = InputEventRecord::parse(&buf);
        match (axes, record.event_type, record.code) {
            (_, EV_SYN, _) => {
                scratch.fired_time = record.time_us;
                *sample = scratch;
                debug!(
                    "decoded values [{}, {}, {}] at {}us",
                    sample.values[0], sample.values[1], sample.values[2], sample.fired_time
                );
                return true;
            }
            (AxisMap::TriAxisRel, EV_REL, REL_X) => scratch.set_axis(0, record.value),
            (AxisMap::TriAxisRel, EV_REL, REL_Y) => scratch.set_axis(1, record.value),
            (AxisMap::TriAxisRel, EV_REL, REL_Z) => scratch.set_axis(2, record.value),
            (AxisMap::AbsDistance, EV_ABS, ABS_DISTANCE) => scratch.set_axis(0, record.value),
            _ => {
                error!(
                    "unknown input event [type = {}, code = {}]",
                    record.event_type, record.code
                );
                return false;
            }
        }
    }

    warn!(
        "no sync marker within {} records",
        MAX_RECORDS_BEFORE_SYN
    );
    false
}

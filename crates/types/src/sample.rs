//! Raw and normalized sensor samples.

use serde::{Deserialize, Serialize};

use crate::constants::SENSOR_DATA_VALUE_SIZE;

/// Accuracy classification reported with every normalized sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accuracy {
    Undefined,
    Bad,
    Normal,
    Good,
    VeryGood,
}

impl Accuracy {
    /// Platform accuracy code (-1..3).
    pub fn code(self) -> i32 {
        match self {
            Accuracy::Undefined => -1,
            Accuracy::Bad => 0,
            Accuracy::Normal => 1,
            Accuracy::Good => 2,
            Accuracy::VeryGood => 3,
        }
    }
}

/// A decoded but not yet unit-converted reading.
///
/// Up to three signed axis values (one state value for scalar sensors) plus
/// a hardware-sourced monotonic timestamp in microseconds. Axis values are
/// sticky: an axis that was not updated during a read cycle keeps its
/// previous value, and `valid` records which axes the current cycle touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    /// Raw axis values (x/y/z, or state in `values[0]` for scalar sensors).
    pub values: [i32; 3],
    /// Which axes were updated by the most recent decode cycle.
    pub valid: [bool; 3],
    /// Hardware timestamp of the last completed update, in microseconds.
    pub fired_time: u64,
}

impl RawSample {
    /// A sample with the sentinel values used before the first decode.
    pub fn new() -> Self {
        Self {
            values: [-1; 3],
            valid: [false; 3],
            fired_time: 0,
        }
    }

    /// Start a new read cycle: clear the per-cycle valid flags while keeping
    /// the sticky values from previous cycles.
    pub fn begin_cycle(&mut self) {
        self.valid = [false; 3];
    }

    /// Record a fresh value for one axis.
    pub fn set_axis(&mut self, axis: usize, value: i32) {
        self.values[axis] = value;
        self.valid[axis] = true;
    }
}

impl Default for RawSample {
    fn default() -> Self {
        Self::new()
    }
}

/// A unit-converted sample, the unit of exchange with the host daemon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedSample {
    /// Accuracy classification.
    pub accuracy: Accuracy,
    /// Hardware timestamp in microseconds.
    pub timestamp: u64,
    /// Number of meaningful entries in `values`.
    pub value_count: usize,
    /// Values in physical units (m/s², distance units, ...).
    pub values: [f32; SENSOR_DATA_VALUE_SIZE],
}

impl NormalizedSample {
    /// Build a sample from a slice of already-converted values.
    pub fn from_values(accuracy: Accuracy, timestamp: u64, converted: &[f32]) -> Self {
        let mut values = [0.0; SENSOR_DATA_VALUE_SIZE];
        let count = converted.len().min(SENSOR_DATA_VALUE_SIZE);
        values[..count].copy_from_slice(&converted[..count]);
        Self {
            accuracy,
            timestamp,
            value_count: count,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_sample_sticky_values() {
        let mut sample = RawSample::new();
        sample.set_axis(0, 100);
        sample.set_axis(1, 200);
        sample.set_axis(2, 300);

        sample.begin_cycle();
        sample.set_axis(1, 250);

        assert_eq!(sample.values, [100, 250, 300]);
        assert_eq!(sample.valid, [false, true, false]);
    }

    #[test]
    fn test_raw_sample_sentinel() {
        let sample = RawSample::new();
        assert_eq!(sample.values, [-1, -1, -1]);
        assert_eq!(sample.fired_time, 0);
    }

    #[test]
    fn test_normalized_sample_value_count() {
        let sample = NormalizedSample::from_values(Accuracy::Good, 42, &[1.0, 2.0, 3.0]);
        assert_eq!(sample.value_count, 3);
        assert_eq!(&sample.values[..3], &[1.0, 2.0, 3.0]);
        assert_eq!(sample.values[3], 0.0);

        let scalar = NormalizedSample::from_values(Accuracy::Undefined, 0, &[1.0]);
        assert_eq!(scalar.value_count, 1);
    }

    #[test]
    fn test_accuracy_codes() {
        assert_eq!(Accuracy::Undefined.code(), -1);
        assert_eq!(Accuracy::VeryGood.code(), 3);
    }
}

//! Conversion from raw counts to physical units.

use sensord_hal_types::constants::{GRAVITY, G_TO_MG};
use sensord_hal_types::{Accuracy, NormalizedSample, RawSample};

/// Per-model scale constants for a raw-count sensor.
#[derive(Debug, Clone, Copy)]
pub struct ScaleConfig {
    /// Milli-g per raw count, from the model calibration table.
    pub raw_data_unit: f32,
    /// ADC resolution bit width.
    pub resolution_bits: u32,
}

impl ScaleConfig {
    /// Physical units (m/s²) per raw count.
    pub fn scale(&self) -> f32 {
        self.raw_data_unit * GRAVITY / G_TO_MG
    }

    /// Minimum reportable value for the configured bit width.
    pub fn min_range(&self) -> f32 {
        let half = 1i64 << (self.resolution_bits - 1);
        -(half as f32) * self.scale()
    }

    /// Maximum reportable value for the configured bit width.
    pub fn max_range(&self) -> f32 {
        let half = 1i64 << (self.resolution_bits - 1);
        ((half - 1) as f32) * self.scale()
    }
}

/// Convert a raw accelerometer sample to m/s².
pub fn normalize_accel(raw: &RawSample, scale: f32) -> NormalizedSample {
    let values = [
        raw.values[0] as f32 * scale,
        raw.values[1] as f32 * scale,
        raw.values[2] as f32 * scale,
    ];
    NormalizedSample::from_values(Accuracy::Good, raw.fired_time, &values)
}

/// Pass a proximity state through unconverted.
pub fn normalize_proximity(raw: &RawSample) -> NormalizedSample {
    NormalizedSample::from_values(Accuracy::Undefined, raw.fired_time, &[raw.values[0] as f32])
}

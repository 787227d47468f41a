//! Shared constants used across the HAL crates.

/// Maximum number of float values carried by a [`NormalizedSample`].
///
/// [`NormalizedSample`]: crate::NormalizedSample
pub const SENSOR_DATA_VALUE_SIZE: usize = 16;

/// Maximum size of one combined sensorhub byte stream read.
pub const SENSOR_HUB_DATA_SIZE: usize = 4096;

/// Bit shift packing a sensor category into the high half of an event type.
pub const SENSOR_EVENT_SHIFT: u32 = 16;

/// Sub-type bit for the raw-data event of a sensor category.
pub const RAW_DATA_EVENT: u32 = 0x0001;

/// Standard gravity, used to convert milli-g raw counts to m/s².
pub const GRAVITY: f32 = 9.80665;

/// Milli-g per g.
pub const G_TO_MG: f32 = 1000.0;

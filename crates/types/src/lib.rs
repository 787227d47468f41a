//! sensord-hal-types: Shared data types for the sensord-hal sensor HAL.
//!
//! This crate contains pure data types (sensor descriptors, raw and
//! normalized samples, accuracy levels) that are shared across all
//! sensord-hal crates. These types have no OS or device-node dependencies,
//! making them suitable as a foundation layer.

pub mod constants;
pub mod descriptor;
pub mod sample;

pub use constants::{
    RAW_DATA_EVENT, SENSOR_DATA_VALUE_SIZE, SENSOR_EVENT_SHIFT, SENSOR_HUB_DATA_SIZE,
};
pub use descriptor::{pack_event_type, SensorCategory, SensorDescriptor};
pub use sample::{Accuracy, NormalizedSample, RawSample};

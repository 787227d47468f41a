//! sensord-hal-core: Core traits and registry for the sensord-hal sensor HAL.
//!
//! This crate contains the fundamental traits (SensorDevice for whole device
//! nodes, HubSensor for demultiplexed sensorhub sub-sensors), the HubRegistry
//! mapping library tags to sub-sensors, and the construction error taxonomy.

mod device;
mod error;
mod hub_sensor;
mod registry;

pub use device::{BoxedSensorDevice, SensorDevice};
pub use error::HalError;
pub use hub_sensor::{hub_sensor_id, hub_tag_of, BoxedHubSensor, HubSensor, HubTransport};
pub use registry::HubRegistry;

// Re-export types used in trait signatures for convenience
pub use sensord_hal_types::{Accuracy, NormalizedSample, RawSample, SensorDescriptor};

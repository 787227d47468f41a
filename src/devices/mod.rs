//! HAL instances for directly attached sensor device nodes.

pub mod accel;
mod generic;
pub mod proxi;

pub use generic::{DeviceSpec, GenericSensorDevice, SensorKind};

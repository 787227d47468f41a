//! Sensorhub coprocessor support.
//!
//! Several virtual sensors arrive interleaved on one combined byte stream
//! from an attached coprocessor. The controller owns the combined device
//! node, the demultiplexer splits the stream into per-sub-sensor packets,
//! and the device glues both behind the regular [`SensorDevice`] contract.
//!
//! [`SensorDevice`]: sensord_hal_core::SensorDevice

mod controller;
mod demux;
mod device;
pub mod sensors;

pub use controller::SensorhubController;
pub use demux::demux;
pub use device::SensorhubDevice;

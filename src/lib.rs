//! sensord-hal: sensor hardware abstraction for Linux mobile devices
//!
//! This library turns raw kernel device nodes into normalized sensor
//! samples, covering:
//! - Device-node resolution across the input and IIO subsystems
//! - Wire decoding of input-event and buffered IIO records
//! - Unit normalization into physical units
//! - Sensorhub coprocessor demultiplexing for hub-routed sensors

pub mod config;
pub mod decode;
pub mod devices;
pub mod node;
pub mod sensorhub;

// Re-export commonly used types
pub use sensord_hal_core::{BoxedSensorDevice, HalError, SensorDevice};
pub use sensord_hal_types::{NormalizedSample, RawSample, SensorDescriptor};

use log::{info, warn};

use crate::config::HalConfig;
use crate::node::Resolver;
use crate::sensorhub::{sensors, SensorhubController, SensorhubDevice};

/// Open every sensor device present on this hardware.
///
/// Construction is best-effort: a sensor whose device node cannot be
/// resolved is logged and skipped, and the remaining devices are still
/// returned. An empty vector means no supported sensor was found.
pub fn create_devices(resolver: &Resolver, config: &HalConfig) -> Vec<BoxedSensorDevice> {
    let mut result: Vec<BoxedSensorDevice> = Vec::new();

    match devices::accel::open(resolver, &config.accel) {
        Ok(device) => result.push(Box::new(device)),
        Err(e) => warn!("no accelerometer device: {}", e),
    }

    match devices::proxi::open(resolver, &config.proxi) {
        Ok(device) => result.push(Box::new(device)),
        Err(e) => warn!("no proximity device: {}", e),
    }

    let controller = SensorhubController::open(resolver.root());
    if controller.is_available() {
        let mut registry = sensord_hal_core::HubRegistry::new();
        match sensors::register_builtin(&mut registry) {
            Ok(()) => {
                info!("sensorhub present, {} sub-sensors registered", registry.len());
                result.push(Box::new(SensorhubDevice::new(controller, registry)));
            }
            Err(e) => warn!("sensorhub sub-sensor registration failed: {}", e),
        }
    }

    info!("{} sensor devices opened", result.len());
    result
}

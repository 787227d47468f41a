//! The sensorhub as one HAL device.

use std::os::unix::io::RawFd;

use log::error;
use sensord_hal_core::{HubRegistry, SensorDevice};
use sensord_hal_types::constants::SENSOR_HUB_DATA_SIZE;
use sensord_hal_types::{NormalizedSample, SensorDescriptor};

use super::controller::SensorhubController;
use super::demux::demux;

/// HAL instance for every sensor routed through the sensorhub.
///
/// The composition root constructs the controller and the populated registry
/// and hands both over; this device owns them for the process lifetime and
/// forwards per-sensor operations to the sub-sensor addressed by the low
/// byte of the id.
pub struct SensorhubDevice {
    controller: SensorhubController,
    registry: HubRegistry,
}

impl SensorhubDevice {
    pub fn new(controller: SensorhubController, registry: HubRegistry) -> Self {
        Self {
            controller,
            registry,
        }
    }
}

impl SensorDevice for SensorhubDevice {
    fn poll_fd(&self) -> RawFd {
        self.controller.poll_fd()
    }

    fn sensors(&self) -> Vec<SensorDescriptor> {
        self.registry.descriptors()
    }

    fn enable(&mut self, id: u32) -> bool {
        self.controller.enable();
        match self.registry.by_id_mut(id) {
            Some(sensor) => sensor.enable(&mut self.controller),
            None => {
                error!("failed to enable hub sensor {:#x}: not registered", id);
                false
            }
        }
    }

    fn disable(&mut self, id: u32) -> bool {
        self.controller.disable();
        match self.registry.by_id_mut(id) {
            Some(sensor) => sensor.disable(&mut self.controller),
            None => {
                error!("failed to disable hub sensor {:#x}: not registered", id);
                false
            }
        }
    }

    fn set_interval(&mut self, id: u32, interval_ms: u64) -> bool {
        match self.registry.by_id_mut(id) {
            Some(sensor) => sensor.set_interval(&mut self.controller, interval_ms),
            None => false,
        }
    }

    fn set_batch_latency(&mut self, id: u32, latency_ms: u64) -> bool {
        match self.registry.by_id_mut(id) {
            Some(sensor) => sensor.set_batch_latency(latency_ms),
            None => false,
        }
    }

    fn set_attribute_int(&mut self, id: u32, attribute: i32, value: i32) -> bool {
        match self.registry.by_id_mut(id) {
            Some(sensor) => sensor.set_attribute_int(&mut self.controller, attribute, value),
            None => false,
        }
    }

    fn set_attribute_str(&mut self, id: u32, attribute: i32, value: &[u8]) -> bool {
        match self.registry.by_id_mut(id) {
            Some(sensor) => sensor.set_attribute_str(&mut self.controller, attribute, value),
            None => false,
        }
    }

    fn read_fd(&mut self) -> Vec<u32> {
        let mut buf = [0u8; SENSOR_HUB_DATA_SIZE];
        let Some(len) = self.controller.read_stream(&mut buf) else {
            return Vec::new();
        };
        demux(&mut self.registry, &buf[..len])
    }

    fn get_data(&mut self, id: u32) -> Option<NormalizedSample> {
        self.registry.by_id_mut(id).and_then(|sensor| sensor.get_data())
    }

    fn flush(&mut self, id: u32) -> bool {
        match self.registry.by_id_mut(id) {
            Some(sensor) => sensor.flush(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensorhub::sensors::{self, HUB_PROXI_LIB_TAG, WRISTUP_LIB_TAG};

    fn hub_device(root: &std::path::Path, stream: &[u8]) -> SensorhubDevice {
        std::fs::create_dir_all(root.join("dev")).unwrap();
        std::fs::write(root.join("dev/ssp_sensorhub"), stream).unwrap();

        let controller = SensorhubController::open(root);
        assert!(controller.is_available());

        let mut registry = HubRegistry::new();
        sensors::register_builtin(&mut registry).unwrap();
        SensorhubDevice::new(controller, registry)
    }

    #[test]
    fn test_combined_stream_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        // Wrist-up packet (1 byte) followed by a hub proximity packet
        // (tag, state, 16-bit raw ADC).
        let stream = [WRISTUP_LIB_TAG, HUB_PROXI_LIB_TAG, 0x01, 0x44, 0x01];
        let mut device = hub_device(dir.path(), &stream);

        let ids = device.read_fd();
        assert_eq!(ids.len(), 2);

        let gesture = device.get_data(ids[0]).unwrap();
        assert_eq!(gesture.value_count, 1);
        assert_eq!(gesture.values[0], 1.0);

        let proxi = device.get_data(ids[1]).unwrap();
        assert_eq!(proxi.value_count, 2);
        assert_eq!(proxi.values[0], 1.0);
        assert_eq!(proxi.values[1], f32::from(u16::from_le_bytes([0x44, 0x01])));
    }

    #[test]
    fn test_lists_builtin_sensors() {
        let dir = tempfile::tempdir().unwrap();
        let device = hub_device(dir.path(), &[]);
        let sensors = device.sensors();
        assert_eq!(sensors.len(), 2);
        assert_eq!(sensors[0].name, "WRIST_UP_SENSOR");
        assert!(sensors[0].wakeup_supported);
    }

    #[test]
    fn test_enable_unknown_id_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut device = hub_device(dir.path(), &[]);
        assert!(!device.enable(0xDEAD));
    }

    #[test]
    fn test_enable_known_id_touches_controller() {
        let dir = tempfile::tempdir().unwrap();
        let mut device = hub_device(dir.path(), &[]);
        let id = device.sensors()[0].id;
        assert!(device.enable(id));
        assert!(device.controller.is_enabled());
        assert!(device.disable(id));
        assert!(!device.controller.is_enabled());
    }

    #[test]
    fn test_get_data_before_any_packet_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut device = hub_device(dir.path(), &[]);
        let id = device.sensors()[0].id;
        assert!(device.get_data(id).is_none());
    }
}

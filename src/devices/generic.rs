//! Generic HAL instance over one kernel device node.
//!
//! The per-sensor differences (wire format, scale constants, descriptor set,
//! hub enable bit) are capability parameters chosen at construction, so one
//! type covers every directly attached sensor kind.

use std::fs::File;
use std::os::raw::c_int;
use std::os::unix::io::{AsRawFd, RawFd};

use log::{info, warn};
use sensord_hal_core::{HalError, SensorDevice};
use sensord_hal_types::{NormalizedSample, RawSample, SensorDescriptor};

use crate::decode::{
    decode_iio, decode_input_events, normalize_accel, normalize_proximity, AxisMap, IioLayout,
};
use crate::node::{set_enable_node, write_node_value, AccessMethod, NodeInfo};

// Set clockid to be used for input-event timestamps (linux/input.h).
nix::ioctl_write_ptr!(eviocsclockid, b'E', 0xa0, c_int);

/// Initial IIO kernel buffer length, in records.
const IIO_BUFFER_LEN: u32 = 480;

/// Decode routine selected from the resolved access method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    InputEvent(AxisMap),
    Iio(IioLayout),
}

/// Which normalization a sensor kind uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Accelerometer,
    Proximity,
}

impl SensorKind {
    fn axis_map(self) -> AxisMap {
        match self {
            SensorKind::Accelerometer => AxisMap::TriAxisRel,
            SensorKind::Proximity => AxisMap::AbsDistance,
        }
    }

    fn iio_layout(self) -> IioLayout {
        match self {
            SensorKind::Accelerometer => IioLayout::TriAxis16,
            SensorKind::Proximity => IioLayout::Scalar16,
        }
    }
}

/// Construction parameters for a [`GenericSensorDevice`].
pub struct DeviceSpec {
    /// Sensor type label for log messages (e.g., "ACCEL").
    pub sensor_type: &'static str,
    /// Logical sensors served by this node.
    pub descriptors: Vec<SensorDescriptor>,
    /// Resolved node paths and access method.
    pub node: NodeInfo,
    pub kind: SensorKind,
    /// Physical units per raw count.
    pub scale: f32,
    /// Whether the enable node is a shared sensorhub bit field.
    pub sensorhub_controlled: bool,
    /// Bit offset in the shared enable node (unused for plain nodes).
    pub enable_bit: u32,
    /// Whether interval changes are written to the interval node. Purely
    /// event-driven sensors accept intervals without a node write.
    pub writes_interval: bool,
    /// Interval applied on the first enable, in milliseconds.
    pub default_interval_ms: u64,
}

/// One HAL instance: owns the open device-node descriptor for its lifetime
/// and the last decoded sample. The descriptor is closed exactly once, when
/// the instance is dropped.
pub struct GenericSensorDevice {
    sensor_type: &'static str,
    descriptors: Vec<SensorDescriptor>,
    node: NodeInfo,
    file: File,
    strategy: DecodeStrategy,
    kind: SensorKind,
    scale: f32,
    sensorhub_controlled: bool,
    enable_bit: u32,
    writes_interval: bool,
    polling_interval_ms: u64,
    sample: RawSample,
}

impl GenericSensorDevice {
    /// Open the resolved data node and select the decode strategy.
    /// Any failure here is permanent; the factory skips this sensor.
    pub fn open(spec: DeviceSpec) -> Result<Self, HalError> {
        let file = File::open(&spec.node.data_node)?;

        let strategy = match spec.node.method {
            AccessMethod::InputEvent => {
                // Monotonic timestamps; a kernel that rejects the ioctl
                // still delivers usable realtime stamps.
                let clock_id: c_int = nix::libc::CLOCK_MONOTONIC;
                if let Err(e) = unsafe { eviocsclockid(file.as_raw_fd(), &clock_id) } {
                    warn!(
                        "{}: failed to set monotonic clock on {}: {}",
                        spec.sensor_type,
                        spec.node.data_node.display(),
                        e
                    );
                }
                DecodeStrategy::InputEvent(spec.kind.axis_map())
            }
            AccessMethod::IioBuffered => {
                if let Some(length_node) = &spec.node.buffer_length_node {
                    write_node_value(length_node, IIO_BUFFER_LEN);
                }
                if let Some(enable_node) = &spec.node.buffer_enable_node {
                    write_node_value(enable_node, 1);
                }
                DecodeStrategy::Iio(spec.kind.iio_layout())
            }
        };

        info!(
            "{} sensor device created on {}",
            spec.sensor_type,
            spec.node.data_node.display()
        );

        Ok(Self {
            sensor_type: spec.sensor_type,
            descriptors: spec.descriptors,
            node: spec.node,
            file,
            strategy,
            kind: spec.kind,
            scale: spec.scale,
            sensorhub_controlled: spec.sensorhub_controlled,
            enable_bit: spec.enable_bit,
            writes_interval: spec.writes_interval,
            polling_interval_ms: spec.default_interval_ms,
            sample: RawSample::new(),
        })
    }

    /// Currently configured polling interval in milliseconds.
    pub fn polling_interval_ms(&self) -> u64 {
        self.polling_interval_ms
    }

    fn serves(&self, id: u32) -> bool {
        self.descriptors.iter().any(|d| d.id == id)
    }

    fn run_decode_cycle(&mut self) -> bool {
        match self.strategy {
            DecodeStrategy::InputEvent(axes) => {
                decode_input_events(&mut self.file, axes, &mut self.sample)
            }
            DecodeStrategy::Iio(layout) => decode_iio(&mut self.file, layout, &mut self.sample),
        }
    }
}

impl SensorDevice for GenericSensorDevice {
    fn poll_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }

    fn sensors(&self) -> Vec<SensorDescriptor> {
        self.descriptors.clone()
    }

    fn enable(&mut self, id: u32) -> bool {
        if !self.serves(id) {
            return false;
        }

        let ok = set_enable_node(
            &self.node.enable_node,
            self.sensorhub_controlled,
            true,
            self.enable_bit,
        );
        self.set_interval(id, self.polling_interval_ms);

        // A sample decoded before re-enabling must never be reported as
        // current.
        self.sample.fired_time = 0;
        info!("{} sensor starting", self.sensor_type);
        ok
    }

    fn disable(&mut self, id: u32) -> bool {
        if !self.serves(id) {
            return false;
        }

        let ok = set_enable_node(
            &self.node.enable_node,
            self.sensorhub_controlled,
            false,
            self.enable_bit,
        );
        info!("{} sensor stopping", self.sensor_type);
        ok
    }

    fn set_interval(&mut self, id: u32, interval_ms: u64) -> bool {
        if !self.serves(id) {
            return false;
        }
        if !self.writes_interval {
            self.polling_interval_ms = interval_ms;
            return true;
        }

        let interval_ns = interval_ms.saturating_mul(1_000_000);
        if !write_node_value(&self.node.interval_node, interval_ns) {
            return false;
        }

        info!(
            "{} interval changed from {}ms to {}ms",
            self.sensor_type, self.polling_interval_ms, interval_ms
        );
        self.polling_interval_ms = interval_ms;
        true
    }

    fn read_fd(&mut self) -> Vec<u32> {
        if self.run_decode_cycle() {
            self.descriptors.iter().map(|d| d.id).collect()
        } else {
            Vec::new()
        }
    }

    fn get_data(&mut self, id: u32) -> Option<NormalizedSample> {
        if !self.serves(id) {
            return None;
        }
        Some(match self.kind {
            SensorKind::Accelerometer => normalize_accel(&self.sample, self.scale),
            SensorKind::Proximity => normalize_proximity(&self.sample),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::read_node_value;
    use sensord_hal_types::{pack_event_type, SensorCategory};
    use std::path::Path;

    fn input_event_bytes(records: &[(i64, u16, u16, i32)]) -> Vec<u8> {
        let mut buf = Vec::new();
        for &(sec, event_type, code, value) in records {
            buf.extend_from_slice(&sec.to_le_bytes());
            buf.extend_from_slice(&0i64.to_le_bytes());
            buf.extend_from_slice(&event_type.to_le_bytes());
            buf.extend_from_slice(&code.to_le_bytes());
            buf.extend_from_slice(&value.to_le_bytes());
        }
        buf
    }

    fn descriptor(id: u32) -> SensorDescriptor {
        SensorDescriptor {
            id,
            name: "Accelerometer".into(),
            category: SensorCategory::Accelerometer,
            event_type: pack_event_type(SensorCategory::Accelerometer, 1),
            model_name: "K2HH".into(),
            vendor: "ST Microelectronics".into(),
            min_range: -39.2,
            max_range: 39.2,
            resolution: 0.0012,
            min_interval: 1,
            max_batch_count: 0,
            wakeup_supported: false,
        }
    }

    fn temp_device(dir: &Path, data: &[u8]) -> GenericSensorDevice {
        let data_node = dir.join("event0");
        let enable_node = dir.join("enable");
        let interval_node = dir.join("poll_delay");
        std::fs::write(&data_node, data).unwrap();
        std::fs::write(&enable_node, "0").unwrap();
        std::fs::write(&interval_node, "0").unwrap();

        GenericSensorDevice::open(DeviceSpec {
            sensor_type: "ACCEL",
            descriptors: vec![descriptor(0x1)],
            node: NodeInfo {
                method: AccessMethod::InputEvent,
                data_node,
                enable_node,
                interval_node,
                buffer_enable_node: None,
                buffer_length_node: None,
            },
            kind: SensorKind::Accelerometer,
            scale: 0.0012,
            sensorhub_controlled: false,
            enable_bit: 0,
            writes_interval: true,
            default_interval_ms: 100,
        })
        .unwrap()
    }

    #[test]
    fn test_read_then_get_data() {
        let dir = tempfile::tempdir().unwrap();
        let stream = input_event_bytes(&[
            (0, 0x02, 0x00, 500),
            (0, 0x02, 0x01, -500),
            (0, 0x02, 0x02, 1000),
            (7, 0x00, 0x00, 0),
        ]);
        let mut device = temp_device(dir.path(), &stream);

        assert_eq!(device.read_fd(), vec![0x1]);
        let data = device.get_data(0x1).unwrap();
        assert_eq!(data.value_count, 3);
        assert_eq!(data.timestamp, 7_000_000);
        assert!((data.values[0] - 500.0 * 0.0012).abs() < 1e-5);
    }

    #[test]
    fn test_enable_is_idempotent_and_resets_fired_time() {
        let dir = tempfile::tempdir().unwrap();
        let stream = input_event_bytes(&[(0, 0x02, 0x00, 5), (3, 0x00, 0x00, 0)]);
        let mut device = temp_device(dir.path(), &stream);

        assert_eq!(device.read_fd(), vec![0x1]);
        assert_eq!(device.get_data(0x1).unwrap().timestamp, 3_000_000);

        assert!(device.enable(0x1));
        assert!(device.enable(0x1));
        assert_eq!(read_node_value::<u32>(&dir.path().join("enable")), Some(1));
        // Stale pre-enable sample is no longer current.
        assert_eq!(device.get_data(0x1).unwrap().timestamp, 0);

        assert!(device.disable(0x1));
        assert_eq!(read_node_value::<u32>(&dir.path().join("enable")), Some(0));
    }

    #[test]
    fn test_set_interval_writes_nanoseconds() {
        let dir = tempfile::tempdir().unwrap();
        let mut device = temp_device(dir.path(), &[]);

        assert!(device.set_interval(0x1, 200));
        assert_eq!(
            read_node_value::<u64>(&dir.path().join("poll_delay")),
            Some(200_000_000)
        );
        assert_eq!(device.polling_interval_ms(), 200);
    }

    #[test]
    fn test_set_interval_failure_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut device = temp_device(dir.path(), &[]);
        assert!(device.set_interval(0x1, 50));

        // Break the interval node, then try to change it.
        device.node.interval_node = dir.path().join("gone").join("poll_delay");
        assert!(!device.set_interval(0x1, 999));
        assert_eq!(device.polling_interval_ms(), 50);
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut device = temp_device(dir.path(), &[]);
        assert!(!device.enable(0x99));
        assert!(device.get_data(0x99).is_none());
    }

    #[test]
    fn test_failed_decode_reports_no_fresh_ids() {
        let dir = tempfile::tempdir().unwrap();
        // Stream ends without a sync marker.
        let stream = input_event_bytes(&[(0, 0x02, 0x00, 5)]);
        let mut device = temp_device(dir.path(), &stream);
        assert!(device.read_fd().is_empty());
    }
}

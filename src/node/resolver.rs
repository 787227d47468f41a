//! Resolution of kernel device-node paths for a sensor type.
//!
//! Given a sensor's input-subsystem key and IIO node names, the resolver
//! scans the running kernel's device tree and produces the full set of
//! data/enable/interval node paths plus the wire protocol that applies.
//! Device-tree layout is fixed for the life of the process: resolution
//! happens once per HAL instance and a miss is a permanent construction
//! failure.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use sensord_hal_core::HalError;

/// Which wire protocol the resolved data node speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMethod {
    /// Legacy input-subsystem event records.
    InputEvent,
    /// Fixed-width buffered IIO records.
    IioBuffered,
}

/// Resolved filesystem paths for one sensor device node.
///
/// Produced once by [`Resolver::resolve`] and read-only afterwards; owned
/// exclusively by the HAL instance that resolved it.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub method: AccessMethod,
    pub data_node: PathBuf,
    pub enable_node: PathBuf,
    pub interval_node: PathBuf,
    pub buffer_enable_node: Option<PathBuf>,
    pub buffer_length_node: Option<PathBuf>,
}

impl NodeInfo {
    /// Log the resolved paths, mirroring what ends up in the kernel tree.
    pub fn log(&self) {
        info!("data node: {}", self.data_node.display());
        info!("enable node: {}", self.enable_node.display());
        info!("interval node: {}", self.interval_node.display());
    }
}

/// Query parameters for node resolution.
#[derive(Debug, Clone)]
pub struct NodeQuery<'a> {
    /// Sensor type label used in log messages (e.g., "ACCEL").
    pub sensor_type: &'a str,
    /// Device name declared by the kernel driver in the input/IIO subsystem.
    pub input_key: &'a str,
    /// Enable node filename under the IIO sysfs directory.
    pub iio_enable_node_name: &'a str,
    /// Interval node filename under the sensorhub virtual device tree.
    pub sensorhub_interval_node_name: &'a str,
    /// Whether this sensor is routed through the sensorhub coprocessor.
    pub sensorhub_controlled: bool,
}

const INPUT_CLASS_DIR: &str = "sys/class/input";
const IIO_DEVICES_DIR: &str = "sys/bus/iio/devices";
const SSP_SENSOR_DIR: &str = "sys/class/sensors/ssp_sensor";

/// Cache of sensorhub-controlled probes. The coprocessor either exports a
/// managed interval node or it does not; that cannot change at runtime.
static SENSORHUB_PROBES: Lazy<Mutex<HashMap<PathBuf, bool>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Device-node resolver rooted at a filesystem prefix.
///
/// The default root is `/`; tests point it at a synthetic tree.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
}

impl Resolver {
    /// Resolver over the running kernel's device tree.
    pub fn new() -> Self {
        Self::with_root("/")
    }

    /// Resolver over an alternate tree root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem prefix this resolver scans under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether this sensor type is routed through the sensorhub, decided by
    /// the existence of its hub-managed interval node. Cached at process
    /// scope.
    pub fn is_sensorhub_controlled(&self, interval_node_name: &str) -> bool {
        let node = self.root.join(SSP_SENSOR_DIR).join(interval_node_name);
        let mut probes = SENSORHUB_PROBES.lock().expect("sensorhub probe cache poisoned");
        *probes
            .entry(node.clone())
            .or_insert_with(|| {
                let controlled = node.exists();
                debug!(
                    "sensorhub probe {}: {}",
                    node.display(),
                    if controlled { "controlled" } else { "direct" }
                );
                controlled
            })
    }

    /// Resolve the node set for a query, or fail permanently.
    pub fn resolve(&self, query: &NodeQuery<'_>) -> Result<NodeInfo, HalError> {
        if let Some(num) = self.find_input_device(query.input_key) {
            debug!("{}: matched input device input{}", query.sensor_type, num);
            return self.input_event_node_info(query, &num);
        }

        if let Some(num) = self.find_iio_device(query.input_key) {
            debug!("{}: matched iio:device{}", query.sensor_type, num);
            return Ok(self.iio_node_info(query, &num));
        }

        warn!(
            "{}: no input or IIO device named \"{}\"",
            query.sensor_type, query.input_key
        );
        Err(HalError::NodeNotFound {
            key: query.input_key.to_string(),
        })
    }

    /// Scan the input subsystem for a device whose declared name matches the
    /// key. Returns the device number suffix of the matching `input<N>`.
    fn find_input_device(&self, key: &str) -> Option<String> {
        scan_for_name(&self.root.join(INPUT_CLASS_DIR), "input", key)
    }

    /// Scan the IIO subsystem the same way, over `iio:device<N>` entries.
    fn find_iio_device(&self, key: &str) -> Option<String> {
        scan_for_name(&self.root.join(IIO_DEVICES_DIR), "iio:device", key)
    }

    fn input_event_node_info(
        &self,
        query: &NodeQuery<'_>,
        device_num: &str,
    ) -> Result<NodeInfo, HalError> {
        let sysfs_dir = self
            .root
            .join(INPUT_CLASS_DIR)
            .join(format!("input{}", device_num));
        let event_name = find_event_entry(&sysfs_dir).ok_or_else(|| HalError::NodeNotFound {
            key: query.input_key.to_string(),
        })?;

        let data_node = self.root.join("dev/input").join(event_name);

        let (enable_node, interval_node) = if query.sensorhub_controlled {
            let ssp_dir = self.root.join(SSP_SENSOR_DIR);
            (
                ssp_dir.join("enable"),
                ssp_dir.join(query.sensorhub_interval_node_name),
            )
        } else {
            (sysfs_dir.join("enable"), sysfs_dir.join("poll_delay"))
        };

        Ok(NodeInfo {
            method: AccessMethod::InputEvent,
            data_node,
            enable_node,
            interval_node,
            buffer_enable_node: None,
            buffer_length_node: None,
        })
    }

    fn iio_node_info(&self, query: &NodeQuery<'_>, device_num: &str) -> NodeInfo {
        let sysfs_dir = self
            .root
            .join(IIO_DEVICES_DIR)
            .join(format!("iio:device{}", device_num));
        let data_node = self.root.join("dev").join(format!("iio:device{}", device_num));

        let interval_node = if query.sensorhub_controlled {
            self.root
                .join(SSP_SENSOR_DIR)
                .join(query.sensorhub_interval_node_name)
        } else {
            sysfs_dir.join("sampling_frequency")
        };

        NodeInfo {
            method: AccessMethod::IioBuffered,
            data_node,
            enable_node: sysfs_dir.join(query.iio_enable_node_name),
            interval_node,
            buffer_enable_node: Some(sysfs_dir.join("buffer/enable")),
            buffer_length_node: Some(sysfs_dir.join("buffer/length")),
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan a device-class directory for an entry whose `name` file matches the
/// key. Returns the numeric suffix after the entry prefix.
fn scan_for_name(class_dir: &Path, prefix: &str, key: &str) -> Option<String> {
    let entries = std::fs::read_dir(class_dir).ok()?;
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(num) = name.strip_prefix(prefix) else {
            continue;
        };
        if let Ok(declared) = std::fs::read_to_string(entry.path().join("name")) {
            if declared.trim() == key {
                return Some(num.to_string());
            }
        }
    }
    None
}

/// Find the `event<N>` child of a matched input device directory.
fn find_event_entry(input_dir: &Path) -> Option<String> {
    let entries = std::fs::read_dir(input_dir).ok()?;
    for entry in entries.flatten() {
        if let Some(name) = entry.file_name().to_str() {
            if name.starts_with("event") {
                return Some(name.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_input_tree(root: &Path, num: u32, name: &str) {
        let input_dir = root.join(INPUT_CLASS_DIR).join(format!("input{}", num));
        std::fs::create_dir_all(input_dir.join(format!("event{}", num))).unwrap();
        std::fs::write(input_dir.join("name"), format!("{}\n", name)).unwrap();
        std::fs::create_dir_all(root.join("dev/input")).unwrap();
    }

    fn fake_iio_tree(root: &Path, num: u32, name: &str) {
        let iio_dir = root.join(IIO_DEVICES_DIR).join(format!("iio:device{}", num));
        std::fs::create_dir_all(iio_dir.join("buffer")).unwrap();
        std::fs::write(iio_dir.join("name"), format!("{}\n", name)).unwrap();
    }

    fn accel_query(sensorhub_controlled: bool) -> NodeQuery<'static> {
        NodeQuery {
            sensor_type: "ACCEL",
            input_key: "accelerometer_sensor",
            iio_enable_node_name: "accel_enable",
            sensorhub_interval_node_name: "accel_poll_delay",
            sensorhub_controlled,
        }
    }

    #[test]
    fn test_resolves_input_event_device() {
        let dir = tempfile::tempdir().unwrap();
        fake_input_tree(dir.path(), 4, "accelerometer_sensor");
        fake_input_tree(dir.path(), 5, "touchscreen");

        let resolver = Resolver::with_root(dir.path());
        let info = resolver.resolve(&accel_query(false)).unwrap();

        assert_eq!(info.method, AccessMethod::InputEvent);
        assert_eq!(info.data_node, dir.path().join("dev/input/event4"));
        assert_eq!(
            info.enable_node,
            dir.path().join("sys/class/input/input4/enable")
        );
        assert_eq!(
            info.interval_node,
            dir.path().join("sys/class/input/input4/poll_delay")
        );
        assert!(info.buffer_enable_node.is_none());
    }

    #[test]
    fn test_falls_back_to_iio() {
        let dir = tempfile::tempdir().unwrap();
        fake_input_tree(dir.path(), 0, "touchscreen");
        fake_iio_tree(dir.path(), 2, "accelerometer_sensor");

        let resolver = Resolver::with_root(dir.path());
        let info = resolver.resolve(&accel_query(false)).unwrap();

        assert_eq!(info.method, AccessMethod::IioBuffered);
        assert_eq!(info.data_node, dir.path().join("dev/iio:device2"));
        assert_eq!(
            info.enable_node,
            dir.path()
                .join("sys/bus/iio/devices/iio:device2/accel_enable")
        );
        assert_eq!(
            info.interval_node,
            dir.path()
                .join("sys/bus/iio/devices/iio:device2/sampling_frequency")
        );
        assert_eq!(
            info.buffer_length_node,
            Some(
                dir.path()
                    .join("sys/bus/iio/devices/iio:device2/buffer/length")
            )
        );
    }

    #[test]
    fn test_sensorhub_controlled_nodes() {
        let dir = tempfile::tempdir().unwrap();
        fake_input_tree(dir.path(), 1, "accelerometer_sensor");
        let ssp_dir = dir.path().join(SSP_SENSOR_DIR);
        std::fs::create_dir_all(&ssp_dir).unwrap();
        std::fs::write(ssp_dir.join("accel_poll_delay"), "0").unwrap();

        let resolver = Resolver::with_root(dir.path());
        assert!(resolver.is_sensorhub_controlled("accel_poll_delay"));
        assert!(!resolver.is_sensorhub_controlled("gyro_poll_delay"));

        let info = resolver.resolve(&accel_query(true)).unwrap();
        assert_eq!(info.enable_node, ssp_dir.join("enable"));
        assert_eq!(info.interval_node, ssp_dir.join("accel_poll_delay"));
    }

    #[test]
    fn test_unresolved_is_hard_failure() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = Resolver::with_root(dir.path());
        let err = resolver.resolve(&accel_query(false));
        assert!(matches!(err, Err(HalError::NodeNotFound { .. })));
    }
}

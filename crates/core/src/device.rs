//! Sensor device trait: the HAL-to-host contract.

use std::os::unix::io::RawFd;

use sensord_hal_types::{NormalizedSample, SensorDescriptor};

/// Trait for all sensor devices.
///
/// One implementation is abstracted from one kernel device event node. The
/// host daemon polls [`poll_fd`](SensorDevice::poll_fd) and, on readiness,
/// calls [`read_fd`](SensorDevice::read_fd) to run one decode cycle, then
/// [`get_data`](SensorDevice::get_data) for each sensor id that reported
/// fresh data.
///
/// Runtime failures (transient decode errors, control-node write failures)
/// surface as boolean/empty returns, never as errors: the host treats them
/// as "no new sample this cycle" and waits for the next readiness signal.
pub trait SensorDevice {
    /// File descriptor the host event loop should poll for readiness.
    fn poll_fd(&self) -> RawFd;

    /// Descriptors of all logical sensors served by this device node.
    fn sensors(&self) -> Vec<SensorDescriptor>;

    /// Start the sensor: write the enable node, re-apply the configured
    /// interval and reset the fired time so a stale pre-enable sample is
    /// never reported as current. Idempotent.
    fn enable(&mut self, id: u32) -> bool;

    /// Stop the sensor. The device node stays open.
    fn disable(&mut self, id: u32) -> bool;

    /// Change the polling interval (milliseconds). On a node-write failure
    /// the in-memory interval is left unchanged and `false` is returned.
    fn set_interval(&mut self, id: u32, interval_ms: u64) -> bool;

    /// Change the batch latency (milliseconds). Unsupported by most devices.
    fn set_batch_latency(&mut self, _id: u32, _latency_ms: u64) -> bool {
        false
    }

    /// Device-specific side-channel command with an integer argument
    /// (e.g., sensorhub firmware commands).
    fn set_attribute_int(&mut self, _id: u32, _attribute: i32, _value: i32) -> bool {
        false
    }

    /// Device-specific side-channel command with a byte-string argument.
    fn set_attribute_str(&mut self, _id: u32, _attribute: i32, _value: &[u8]) -> bool {
        false
    }

    /// Run one decode cycle. Called by the host when the poll descriptor is
    /// readable. Returns the ids of sensors that now have fresh data; empty
    /// on a transient decode failure.
    fn read_fd(&mut self) -> Vec<u32>;

    /// Snapshot of the current sample for one sensor, unit-converted.
    ///
    /// Always succeeds once at least one decode cycle has completed. Before
    /// the first successful decode the returned sample carries timestamp 0
    /// and sentinel values; callers must gate on `read_fd` success.
    fn get_data(&mut self, id: u32) -> Option<NormalizedSample>;

    /// Flush batched samples. Unsupported by most devices.
    fn flush(&mut self, _id: u32) -> bool {
        false
    }
}

/// Type-erased sensor device for dynamic dispatch.
pub type BoxedSensorDevice = Box<dyn SensorDevice>;

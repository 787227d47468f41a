//! Sensorhub sub-sensor trait.
//!
//! Sensors routed through the sensorhub coprocessor do not own a device
//! node; they receive their packets from the demultiplexer and talk to the
//! hub through the transport handed in by the owning device.

use sensord_hal_types::{NormalizedSample, SensorDescriptor};

/// Write access to the sensorhub coprocessor, implemented by the controller
/// that owns the combined device node.
pub trait HubTransport {
    /// Send a raw command buffer to the hub firmware. Returns false when the
    /// hub rejects the write (e.g., during a firmware update).
    fn send_command(&mut self, data: &[u8]) -> bool;
}

/// Composite sensor id for a sub-sensor: category code in the high byte,
/// library tag in the low byte, so the tag is recoverable from the id.
pub fn hub_sensor_id(category_code: u32, tag: u8) -> u32 {
    (category_code << 8) | u32::from(tag)
}

/// Library tag addressed by a composite sensor id.
pub fn hub_tag_of(id: u32) -> u8 {
    (id & 0xFF) as u8
}

/// Trait for all sensorhub sub-sensors.
///
/// `parse` is the demultiplexer contract: the sub-sensor is handed the
/// remaining combined buffer starting at its own tag byte and must report
/// how many bytes its packet occupies. Packet length is sensor-specific;
/// there is no length field in the stream to validate it against.
pub trait HubSensor {
    /// Composite sensor id (see [`hub_sensor_id`]).
    fn id(&self) -> u32;

    /// Static metadata for this sub-sensor.
    fn descriptor(&self) -> SensorDescriptor;

    /// Enable this sub-sensor on the hub.
    fn enable(&mut self, hub: &mut dyn HubTransport) -> bool;

    /// Disable this sub-sensor on the hub.
    fn disable(&mut self, hub: &mut dyn HubTransport) -> bool;

    /// Change the sampling interval (milliseconds).
    fn set_interval(&mut self, _hub: &mut dyn HubTransport, _interval_ms: u64) -> bool {
        false
    }

    /// Change the batch latency (milliseconds).
    fn set_batch_latency(&mut self, _latency_ms: u64) -> bool {
        false
    }

    /// Decode one packet from the head of `data` and cache its values.
    /// Returns the number of bytes consumed, or `None` when `data` does not
    /// hold a complete packet for this sensor.
    fn parse(&mut self, data: &[u8]) -> Option<usize>;

    /// Snapshot of the most recently parsed packet.
    fn get_data(&self) -> Option<NormalizedSample>;

    /// Firmware side-channel command with an integer argument.
    fn set_attribute_int(
        &mut self,
        _hub: &mut dyn HubTransport,
        _attribute: i32,
        _value: i32,
    ) -> bool {
        false
    }

    /// Firmware side-channel command with a byte-string argument.
    fn set_attribute_str(
        &mut self,
        _hub: &mut dyn HubTransport,
        _attribute: i32,
        _value: &[u8],
    ) -> bool {
        false
    }

    /// Flush batched samples.
    fn flush(&mut self) -> bool {
        false
    }
}

/// Type-erased sub-sensor for dynamic dispatch.
pub type BoxedHubSensor = Box<dyn HubSensor>;

//! Proximity HAL instance builder.

use sensord_hal_core::HalError;
use sensord_hal_types::constants::RAW_DATA_EVENT;
use sensord_hal_types::{pack_event_type, SensorCategory, SensorDescriptor};

use crate::config::ProxiModelConfig;
use crate::node::{NodeQuery, Resolver};

use super::{DeviceSpec, GenericSensorDevice, SensorKind};

const SENSOR_TYPE: &str = "PROXI";
const INPUT_NAME: &str = "proximity_sensor";
const IIO_ENABLE_NODE_NAME: &str = "proximity_enable";
const SENSORHUB_POLL_NODE_NAME: &str = "prox_poll_delay";

/// Bit offset in the shared sensorhub enable node.
pub const PROXI_ENABLE_BIT: u32 = 7;

pub const PROXI_ID: u32 = 0x1;

fn descriptor(config: &ProxiModelConfig) -> SensorDescriptor {
    SensorDescriptor {
        id: PROXI_ID,
        name: "Proximity Sensor".to_string(),
        category: SensorCategory::Proximity,
        event_type: pack_event_type(SensorCategory::Proximity, RAW_DATA_EVENT),
        model_name: config.model_name.clone(),
        vendor: config.vendor.clone(),
        min_range: config.min_range,
        max_range: config.max_range,
        resolution: 1.0,
        min_interval: config.min_interval_ms,
        max_batch_count: 0,
        wakeup_supported: false,
    }
}

/// Resolve, open and configure the proximity device node.
///
/// Proximity is event-driven: interval changes are accepted but not written
/// to a node.
pub fn open(resolver: &Resolver, config: &ProxiModelConfig) -> Result<GenericSensorDevice, HalError> {
    let sensorhub_controlled = resolver.is_sensorhub_controlled(SENSORHUB_POLL_NODE_NAME);
    let query = NodeQuery {
        sensor_type: SENSOR_TYPE,
        input_key: INPUT_NAME,
        iio_enable_node_name: IIO_ENABLE_NODE_NAME,
        sensorhub_interval_node_name: SENSORHUB_POLL_NODE_NAME,
        sensorhub_controlled,
    };

    let node = resolver.resolve(&query)?;
    node.log();

    GenericSensorDevice::open(DeviceSpec {
        sensor_type: SENSOR_TYPE,
        descriptors: vec![descriptor(config)],
        node,
        kind: SensorKind::Proximity,
        scale: 1.0,
        sensorhub_controlled,
        enable_bit: PROXI_ENABLE_BIT,
        writes_interval: false,
        default_interval_ms: 100,
    })
}

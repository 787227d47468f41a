//! Accelerometer HAL instance builder.

use sensord_hal_core::HalError;
use sensord_hal_types::constants::RAW_DATA_EVENT;
use sensord_hal_types::{pack_event_type, SensorCategory, SensorDescriptor};

use crate::config::AccelModelConfig;
use crate::decode::ScaleConfig;
use crate::node::{NodeQuery, Resolver};

use super::{DeviceSpec, GenericSensorDevice, SensorKind};

const SENSOR_TYPE: &str = "ACCEL";
const INPUT_NAME: &str = "accelerometer_sensor";
const IIO_ENABLE_NODE_NAME: &str = "accel_enable";
const SENSORHUB_POLL_NODE_NAME: &str = "accel_poll_delay";

/// Bit offset in the shared sensorhub enable node.
pub const ACCEL_ENABLE_BIT: u32 = 0;

/// Logical sensor ids served by the accelerometer node. The raw variant
/// shares the device and differs only in its event type.
pub const ACCEL_ID: u32 = 0x1;
pub const ACCEL_RAW_ID: u32 = 0x2;

fn descriptors(config: &AccelModelConfig, scale: &ScaleConfig) -> Vec<SensorDescriptor> {
    let base = SensorDescriptor {
        id: ACCEL_ID,
        name: "Accelerometer".to_string(),
        category: SensorCategory::Accelerometer,
        event_type: pack_event_type(SensorCategory::Accelerometer, RAW_DATA_EVENT),
        model_name: config.model_name.clone(),
        vendor: config.vendor.clone(),
        min_range: scale.min_range(),
        max_range: scale.max_range(),
        resolution: scale.scale(),
        min_interval: config.min_interval_ms,
        max_batch_count: 0,
        wakeup_supported: false,
    };

    let raw = SensorDescriptor {
        id: ACCEL_RAW_ID,
        name: "Accelerometer RAW".to_string(),
        event_type: pack_event_type(SensorCategory::Accelerometer, 0x0002),
        ..base.clone()
    };

    vec![base, raw]
}

/// The range formula shifts by `resolution_bits - 1`, so the bit width must
/// fit a real ADC and the per-count unit must be positive.
fn validate(config: &AccelModelConfig) -> Result<(), HalError> {
    if config.raw_data_unit <= 0.0 {
        return Err(HalError::MissingConfig {
            element: "raw_data_unit".to_string(),
        });
    }
    if config.resolution_bits == 0 || config.resolution_bits > 32 {
        return Err(HalError::MissingConfig {
            element: "resolution_bits".to_string(),
        });
    }
    Ok(())
}

/// Resolve, open and configure the accelerometer device node.
pub fn open(resolver: &Resolver, config: &AccelModelConfig) -> Result<GenericSensorDevice, HalError> {
    validate(config)?;

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

    let scale = ScaleConfig {
        raw_data_unit: config.raw_data_unit,
        resolution_bits: config.resolution_bits,
    };

    GenericSensorDevice::open(DeviceSpec {
        sensor_type: SENSOR_TYPE,
        descriptors: descriptors(config, &scale),
        node,
        kind: SensorKind::Accelerometer,
        scale: scale.scale(),
        sensorhub_controlled,
        enable_bit: ACCEL_ENABLE_BIT,
        writes_interval: true,
        default_interval_ms: 100,
    })
}

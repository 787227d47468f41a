//! Hub-routed proximity sub-sensor.

use log::{debug, warn};
use sensord_hal_core::{hub_sensor_id, HubSensor, HubTransport};
use sensord_hal_types::constants::RAW_DATA_EVENT;
use sensord_hal_types::{
    pack_event_type, Accuracy, NormalizedSample, SensorCategory, SensorDescriptor,
};

use super::timestamp_us;

/// Library tag of hub-routed proximity in the combined stream.
pub const HUB_PROXI_LIB_TAG: u8 = 2;

/// Tag byte, near/far state byte, 16-bit little-endian raw ADC reading.
const PACKET_SIZE: usize = 4;

/// Proximity reported through the hub rather than its own device node.
/// Each packet carries the binary near/far state plus the raw ADC count.
pub struct HubProximitySensor {
    last: Option<NormalizedSample>,
}

impl HubProximitySensor {
    pub fn new() -> Self {
        Self { last: None }
    }
}

impl Default for HubProximitySensor {
    fn default() -> Self {
        Self::new()
    }
}

impl HubSensor for HubProximitySensor {
    fn id(&self) -> u32 {
        hub_sensor_id(SensorCategory::Proximity.code(), HUB_PROXI_LIB_TAG)
    }

    fn descriptor(&self) -> SensorDescriptor {
        SensorDescriptor {
            id: self.id(),
            name: "Proximity Sensor".to_string(),
            category: SensorCategory::Proximity,
            event_type: pack_event_type(SensorCategory::Proximity, RAW_DATA_EVENT),
            model_name: "Sensorhub Proximity".to_string(),
            vendor: "Samsung Electronics".to_string(),
            min_range: 0.0,
            max_range: 1.0,
            resolution: 1.0,
            min_interval: 0,
            max_batch_count: 0,
            wakeup_supported: false,
        }
    }

    fn enable(&mut self, hub: &mut dyn HubTransport) -> bool {
        let ok = hub.send_command(&[HUB_PROXI_LIB_TAG, 1]);
        if !ok {
            warn!("hub proximity enable command rejected");
        }
        ok
    }

    fn disable(&mut self, hub: &mut dyn HubTransport) -> bool {
        let ok = hub.send_command(&[HUB_PROXI_LIB_TAG, 0]);
        if !ok {
            warn!("hub proximity disable command rejected");
        }
        ok
    }

    fn parse(&mut self, data: &[u8]) -> Option<usize> {
        if data.len() < PACKET_SIZE {
            return None;
        }
        let state = data[1];
        let adc = u16::from_le_bytes([data[2], data[3]]);
        self.last = Some(NormalizedSample::from_values(
            Accuracy::Undefined,
            timestamp_us(),
            &[f32::from(state), f32::from(adc)],
        ));
        debug!("hub proximity state {} adc {}", state, adc);
        Some(PACKET_SIZE)
    }

    fn get_data(&self) -> Option<NormalizedSample> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_state_and_adc() {
        let mut sensor = HubProximitySensor::new();
        let packet = [HUB_PROXI_LIB_TAG, 0x01, 0x34, 0x12];

        assert_eq!(sensor.parse(&packet), Some(4));
        let sample = sensor.get_data().unwrap();
        assert_eq!(sample.value_count, 2);
        assert_eq!(sample.values[0], 1.0);
        assert_eq!(sample.values[1], 0x1234 as f32);
    }

    #[test]
    fn test_parse_short_packet_is_none() {
        let mut sensor = HubProximitySensor::new();
        assert!(sensor.parse(&[HUB_PROXI_LIB_TAG, 0x01]).is_none());
        assert!(sensor.get_data().is_none());
    }
}

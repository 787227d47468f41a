//! Wrist-up gesture sub-sensor.

use log::{debug, warn};
use sensord_hal_core::{hub_sensor_id, HubSensor, HubTransport};
use sensord_hal_types::{
    pack_event_type, Accuracy, NormalizedSample, SensorCategory, SensorDescriptor,
};

use super::timestamp_us;

/// Library tag of the wrist-up gesture in the combined hub stream.
pub const WRISTUP_LIB_TAG: u8 = 0;

/// The wrist-up packet is the tag byte alone; its arrival is the gesture.
const PACKET_SIZE: usize = 1;

const RAISE_EVENT: u32 = 0x0001;

/// Wake-up gesture recognized on the hub. The packet carries no payload;
/// every occurrence reports the fixed gesture value 1.
pub struct WristUpSensor {
    last: Option<NormalizedSample>,
}

impl WristUpSensor {
    pub fn new() -> Self {
        Self { last: None }
    }
}

impl Default for WristUpSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl HubSensor for WristUpSensor {
    fn id(&self) -> u32 {
        hub_sensor_id(SensorCategory::GestureWristUp.code(), WRISTUP_LIB_TAG)
    }

    fn descriptor(&self) -> SensorDescriptor {
        SensorDescriptor {
            id: self.id(),
            name: "WRIST_UP_SENSOR".to_string(),
            category: SensorCategory::GestureWristUp,
            event_type: pack_event_type(SensorCategory::GestureWristUp, RAISE_EVENT),
            model_name: "Wristup".to_string(),
            vendor: "Samsung Electronics".to_string(),
            min_range: 0.0,
            max_range: 1.0,
            resolution: 1.0,
            min_interval: 0,
            max_batch_count: 0,
            wakeup_supported: true,
        }
    }

    fn enable(&mut self, hub: &mut dyn HubTransport) -> bool {
        let ok = hub.send_command(&[WRISTUP_LIB_TAG, 1]);
        if !ok {
            warn!("wristup enable command rejected by hub");
        }
        ok
    }

    fn disable(&mut self, hub: &mut dyn HubTransport) -> bool {
        let ok = hub.send_command(&[WRISTUP_LIB_TAG, 0]);
        if !ok {
            warn!("wristup disable command rejected by hub");
        }
        ok
    }

    fn parse(&mut self, data: &[u8]) -> Option<usize> {
        if data.len() < PACKET_SIZE {
            return None;
        }
        self.last = Some(NormalizedSample::from_values(
            Accuracy::Undefined,
            timestamp_us(),
            &[1.0],
        ));
        debug!("wristup gesture fired");
        Some(PACKET_SIZE)
    }

    fn get_data(&self) -> Option<NormalizedSample> {
        self.last
    }
}

//! Registry mapping sensorhub library tags to sub-sensors.

use std::collections::HashMap;

use log::debug;
use sensord_hal_types::SensorDescriptor;

use crate::error::HalError;
use crate::hub_sensor::{hub_tag_of, BoxedHubSensor};

/// Registry of sensorhub sub-sensors, keyed by their library tag.
///
/// Populated once by an explicit initialization routine before any decoding
/// starts, and only read afterwards. Registration order is preserved so that
/// sensor enumeration is deterministic.
#[derive(Default)]
pub struct HubRegistry {
    sensors: HashMap<u8, BoxedHubSensor>,
    order: Vec<u8>,
}

impl HubRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sub-sensor under its library tag.
    ///
    /// Tags must be disjoint; a duplicate registration is a setup error.
    pub fn register(&mut self, tag: u8, sensor: BoxedHubSensor) -> Result<(), HalError> {
        if self.sensors.contains_key(&tag) {
            return Err(HalError::DuplicateTag { tag });
        }
        debug!("registered sensorhub lib {:#04x} (id {:#x})", tag, sensor.id());
        self.sensors.insert(tag, sensor);
        self.order.push(tag);
        Ok(())
    }

    /// Look up the sub-sensor owning a library tag.
    pub fn get_mut(&mut self, tag: u8) -> Option<&mut BoxedHubSensor> {
        self.sensors.get_mut(&tag)
    }

    /// Look up a sub-sensor by its composite sensor id.
    pub fn by_id_mut(&mut self, id: u32) -> Option<&mut BoxedHubSensor> {
        self.sensors.get_mut(&hub_tag_of(id))
    }

    /// Descriptors of all registered sub-sensors, in registration order.
    pub fn descriptors(&self) -> Vec<SensorDescriptor> {
        self.order
            .iter()
            .filter_map(|tag| self.sensors.get(tag))
            .map(|sensor| sensor.descriptor())
            .collect()
    }

    /// Registered tags, in registration order.
    pub fn tags(&self) -> &[u8] {
        &self.order
    }

    /// Number of registered sub-sensors.
    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub_sensor::{hub_sensor_id, HubSensor, HubTransport};
    use sensord_hal_types::{pack_event_type, NormalizedSample, SensorCategory};

    struct StubSensor {
        tag: u8,
    }

    impl HubSensor for StubSensor {
        fn id(&self) -> u32 {
            hub_sensor_id(SensorCategory::GestureWristUp.code(), self.tag)
        }

        fn descriptor(&self) -> SensorDescriptor {
            SensorDescriptor {
                id: self.id(),
                name: format!("stub-{}", self.tag),
                category: SensorCategory::GestureWristUp,
                event_type: pack_event_type(SensorCategory::GestureWristUp, 1),
                model_name: "stub".into(),
                vendor: "stub".into(),
                min_range: 0.0,
                max_range: 1.0,
                resolution: 1.0,
                min_interval: 0,
                max_batch_count: 0,
                wakeup_supported: false,
            }
        }

        fn enable(&mut self, _hub: &mut dyn HubTransport) -> bool {
            true
        }

        fn disable(&mut self, _hub: &mut dyn HubTransport) -> bool {
            true
        }

        fn parse(&mut self, _data: &[u8]) -> Option<usize> {
            Some(1)
        }

        fn get_data(&self) -> Option<NormalizedSample> {
            None
        }
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let mut registry = HubRegistry::new();
        registry.register(3, Box::new(StubSensor { tag: 3 })).unwrap();
        let err = registry.register(3, Box::new(StubSensor { tag: 3 }));
        assert!(matches!(err, Err(HalError::DuplicateTag { tag: 3 })));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_by_composite_id() {
        let mut registry = HubRegistry::new();
        registry.register(5, Box::new(StubSensor { tag: 5 })).unwrap();
        let id = hub_sensor_id(SensorCategory::GestureWristUp.code(), 5);
        assert!(registry.by_id_mut(id).is_some());
        assert!(registry.by_id_mut(id + 1).is_none());
    }

    #[test]
    fn test_descriptors_follow_registration_order() {
        let mut registry = HubRegistry::new();
        registry.register(9, Box::new(StubSensor { tag: 9 })).unwrap();
        registry.register(1, Box::new(StubSensor { tag: 1 })).unwrap();
        let names: Vec<String> = registry
            .descriptors()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["stub-9".to_string(), "stub-1".to_string()]);
    }
}

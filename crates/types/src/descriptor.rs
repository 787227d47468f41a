//! Static sensor metadata exposed to the host daemon.

use serde::{Deserialize, Serialize};

use crate::constants::SENSOR_EVENT_SHIFT;

/// Category of a physical or virtual sensor.
///
/// The numeric values match the platform sensor type codes, so they can be
/// packed into event types and handed across the HAL boundary unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorCategory {
    Unknown,
    Accelerometer,
    Proximity,
    GestureWristUp,
}

impl SensorCategory {
    /// Platform type code for this category.
    pub fn code(self) -> u32 {
        match self {
            SensorCategory::Unknown => 0,
            SensorCategory::Accelerometer => 1,
            SensorCategory::Proximity => 4,
            SensorCategory::GestureWristUp => 38,
        }
    }
}

/// Pack a sensor category and sub-type bit field into an event-type tag.
pub fn pack_event_type(category: SensorCategory, subtype: u32) -> u32 {
    (category.code() << SENSOR_EVENT_SHIFT) | subtype
}

/// Static metadata for one physical or virtual sensor.
///
/// Built once at HAL-instance construction from configuration lookup or
/// compiled defaults, and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorDescriptor {
    /// Identifier, unique within the HAL.
    pub id: u32,
    /// Display name (e.g., "Accelerometer").
    pub name: String,
    /// Sensor category.
    pub category: SensorCategory,
    /// Category packed with a sub-type bit field.
    pub event_type: u32,
    /// Hardware model name (e.g., "K2HH").
    pub model_name: String,
    /// Hardware vendor.
    pub vendor: String,
    /// Minimum reportable value in physical units.
    pub min_range: f32,
    /// Maximum reportable value in physical units.
    pub max_range: f32,
    /// Physical units per raw count.
    pub resolution: f32,
    /// Minimum sampling interval in milliseconds.
    pub min_interval: u64,
    /// Maximum number of batched samples (0 = no batching).
    pub max_batch_count: u32,
    /// Whether this sensor can wake the device from suspend.
    pub wakeup_supported: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::RAW_DATA_EVENT;

    #[test]
    fn test_event_type_packing() {
        let event_type = pack_event_type(SensorCategory::Accelerometer, RAW_DATA_EVENT);
        assert_eq!(event_type, (1 << 16) | 0x0001);
        assert_eq!(event_type >> 16, SensorCategory::Accelerometer.code());
    }

    #[test]
    fn test_descriptor_serde_round_trip() {
        let descriptor = SensorDescriptor {
            id: 0x1,
            name: "Accelerometer".to_string(),
            category: SensorCategory::Accelerometer,
            event_type: pack_event_type(SensorCategory::Accelerometer, RAW_DATA_EVENT),
            model_name: "K2HH".to_string(),
            vendor: "ST Microelectronics".to_string(),
            min_range: -39.24,
            max_range: 39.24,
            resolution: 0.0012,
            min_interval: 1,
            max_batch_count: 0,
            wakeup_supported: false,
        };

        let json = serde_json::to_string(&descriptor).unwrap();
        let back: SensorDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, descriptor.id);
        assert_eq!(back.name, descriptor.name);
        assert_eq!(back.category, descriptor.category);
        assert_eq!(back.event_type, descriptor.event_type);
        assert_eq!(back.min_interval, descriptor.min_interval);
        assert!((back.max_range - descriptor.max_range).abs() < 1e-6);
    }

    #[test]
    fn test_category_codes_are_distinct() {
        let codes = [
            SensorCategory::Unknown.code(),
            SensorCategory::Accelerometer.code(),
            SensorCategory::Proximity.code(),
            SensorCategory::GestureWristUp.code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}

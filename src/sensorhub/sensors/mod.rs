//! Built-in sensorhub sub-sensors.

mod proximity;
mod wristup;

pub use proximity::{HubProximitySensor, HUB_PROXI_LIB_TAG};
pub use wristup::{WristUpSensor, WRISTUP_LIB_TAG};

use nix::time::{clock_gettime, ClockId};
use sensord_hal_core::{HalError, HubRegistry};

/// Register every built-in sub-sensor with the registry.
pub fn register_builtin(registry: &mut HubRegistry) -> Result<(), HalError> {
    registry.register(WRISTUP_LIB_TAG, Box::new(WristUpSensor::new()))?;
    registry.register(HUB_PROXI_LIB_TAG, Box::new(HubProximitySensor::new()))?;
    Ok(())
}

/// Arrival timestamp for hub packets, in microseconds. Hub packets carry no
/// hardware timestamp of their own; the monotonic clock keeps them in the
/// same time domain as the input-event nodes (EVIOCSCLOCKID).
pub(crate) fn timestamp_us() -> u64 {
    match clock_gettime(ClockId::CLOCK_MONOTONIC) {
        Ok(ts) => (ts.tv_sec() as u64)
            .saturating_mul(1_000_000)
            .saturating_add(ts.tv_nsec() as u64 / 1_000),
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_builtin_populates_registry() {
        let mut registry = HubRegistry::new();
        register_builtin(&mut registry).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.tags(), vec![WRISTUP_LIB_TAG, HUB_PROXI_LIB_TAG]);
    }

    #[test]
    fn test_register_builtin_twice_is_duplicate() {
        let mut registry = HubRegistry::new();
        register_builtin(&mut registry).unwrap();
        assert!(register_builtin(&mut registry).is_err());
    }

    #[test]
    fn test_timestamps_are_monotonic() {
        let first = timestamp_us();
        let second = timestamp_us();
        assert!(first > 0);
        assert!(second >= first);
    }
}

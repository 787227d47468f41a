//! Demultiplexing of the combined sensorhub byte stream.

use log::{error, warn};
use sensord_hal_core::HubRegistry;

/// Split one combined buffer into per-sub-sensor packets and dispatch each
/// to its registered parser.
///
/// The cursor walks the buffer: the single byte at the cursor is the library
/// tag, the registry names the responsible parser, and the parser reports
/// how many bytes its packet occupied — there is no length field to validate
/// this against. An unknown tag, a parser that cannot parse, or a reported
/// length that escapes the buffer abort the remaining buffer; already parsed
/// packets keep their results and the discarded bytes are simply gone (the
/// next poll cycle reads fresh data).
///
/// Returns the sub-sensor ids that received a packet, in stream order; the
/// host queries exactly those via `get_data`.
pub fn demux(registry: &mut HubRegistry, data: &[u8]) -> Vec<u32> {
    let mut event_ids = Vec::new();
    let mut cursor = 0;

    while cursor < data.len() {
        let tag = data[cursor];
        let Some(sensor) = registry.get_mut(tag) else {
            warn!(
                "unknown sensorhub lib tag {:#04x}, dropping {} bytes",
                tag,
                data.len() - cursor
            );
            break;
        };

        let remaining = &data[cursor..];
        match sensor.parse(remaining) {
            Some(consumed) if consumed > 0 && consumed <= remaining.len() => {
                event_ids.push(sensor.id());
                cursor += consumed;
            }
            Some(consumed) => {
                error!(
                    "lib {:#04x} parser consumed {} of {} bytes, dropping rest",
                    tag,
                    consumed,
                    remaining.len()
                );
                break;
            }
            None => {
                error!("lib {:#04x} failed to parse, dropping rest", tag);
                break;
            }
        }
    }

    event_ids
}

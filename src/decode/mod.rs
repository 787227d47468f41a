//! Raw record decoding and unit normalization.

mod iio;
mod input_event;
mod normalize;

pub use iio::{decode_iio, parse_iio_record, IioLayout};
pub use input_event::{decode_input_events, AxisMap, MAX_RECORDS_BEFORE_SYN};
pub use normalize::{normalize_accel, normalize_proximity, ScaleConfig};

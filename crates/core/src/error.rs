//! Construction error taxonomy.

use thiserror::Error;

/// Errors that make a HAL instance unusable.
///
/// These only occur during construction or registry setup. The device-tree
/// layout is fixed for the life of the process, so none of them is
/// retryable: the factory logs the error, skips the sensor and continues
/// with the others.
#[derive(Debug, Error)]
pub enum HalError {
    /// No input or IIO device in the kernel tree declares the queried name.
    #[error("no device node found for key \"{key}\"")]
    NodeNotFound { key: String },

    /// Opening or configuring the resolved device node failed.
    #[error("device node I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required calibration element is missing or unusable in the model
    /// config.
    #[error("missing or invalid config element [{element}]")]
    MissingConfig { element: String },

    /// Two sensorhub sub-sensors claimed the same library tag.
    #[error("sensorhub tag {tag:#04x} registered twice")]
    DuplicateTag { tag: u8 },
}

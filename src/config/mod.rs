//! Configuration management

mod settings;

pub use settings::{AccelModelConfig, HalConfig, ProxiModelConfig};

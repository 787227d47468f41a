//! Per-model calibration configuration.
//!
//! Calibration constants differ per hardware model; they are loaded from a
//! JSON file shipped with the device image. A missing file falls back to the
//! compiled defaults for the reference hardware.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default system path of the calibration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sensord-hal/config.json";

/// HAL-wide configuration: one section per physical sensor type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HalConfig {
    #[serde(default)]
    pub accel: AccelModelConfig,
    #[serde(default)]
    pub proxi: ProxiModelConfig,
}

impl HalConfig {
    /// Load configuration from the default system path. A missing file is
    /// not an error; the compiled defaults apply.
    pub fn load() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from_path(path)
    }

    /// Load configuration from a specific file path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for HalConfig {
    fn default() -> Self {
        Self {
            accel: AccelModelConfig::default(),
            proxi: ProxiModelConfig::default(),
        }
    }
}

/// Accelerometer model calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccelModelConfig {
    #[serde(default = "default_accel_model")]
    pub model_name: String,
    #[serde(default = "default_accel_vendor")]
    pub vendor: String,
    /// ADC resolution bit width.
    #[serde(default = "default_accel_resolution")]
    pub resolution_bits: u32,
    /// Milli-g per raw count.
    #[serde(default = "default_accel_raw_data_unit")]
    pub raw_data_unit: f32,
    #[serde(default = "default_min_interval")]
    pub min_interval_ms: u64,
}

fn default_accel_model() -> String {
    "K2HH".to_string()
}

fn default_accel_vendor() -> String {
    "ST Microelectronics".to_string()
}

fn default_accel_resolution() -> u32 {
    16
}

fn default_accel_raw_data_unit() -> f32 {
    0.122
}

fn default_min_interval() -> u64 {
    1
}

impl Default for AccelModelConfig {
    fn default() -> Self {
        Self {
            model_name: default_accel_model(),
            vendor: default_accel_vendor(),
            resolution_bits: default_accel_resolution(),
            raw_data_unit: default_accel_raw_data_unit(),
            min_interval_ms: default_min_interval(),
        }
    }
}

/// Proximity model calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxiModelConfig {
    #[serde(default = "default_proxi_model")]
    pub model_name: String,
    #[serde(default = "default_proxi_vendor")]
    pub vendor: String,
    #[serde(default)]
    pub min_range: f32,
    #[serde(default = "default_proxi_max_range")]
    pub max_range: f32,
    #[serde(default = "default_min_interval")]
    pub min_interval_ms: u64,
}

fn default_proxi_model() -> String {
    "IMS1911".to_string()
}

fn default_proxi_vendor() -> String {
    "ITM".to_string()
}

fn default_proxi_max_range() -> f32 {
    5.0
}

impl Default for ProxiModelConfig {
    fn default() -> Self {
        Self {
            model_name: default_proxi_model(),
            vendor: default_proxi_vendor(),
            min_range: 0.0,
            max_range: default_proxi_max_range(),
            min_interval_ms: default_min_interval(),
        }
    }
}

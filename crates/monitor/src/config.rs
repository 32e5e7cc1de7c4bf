//! Monitor configuration
//!
//! All settings are fixed at process start; there is no hot reload.

use crate::MonitorError;
use camera_source::SourceConfig;
use risk_eval::{DetectorConfig, EvalError, Roi};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Default config file stem (blindspot.toml next to the binary)
pub const DEFAULT_CONFIG_NAME: &str = "blindspot";

/// Serial link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Serial device path ("/dev/ttyUSB0", "COM4"), or "mock" for the
    /// simulated controller
    pub device: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Bounded timeout for one inbound read (ms)
    pub read_timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            device: "/dev/ttyUSB0".to_string(),
            baud_rate: 9600,
            read_timeout_ms: 1000,
        }
    }
}

impl SerialSettings {
    /// Whether the simulated controller should be used
    pub fn is_mock(&self) -> bool {
        self.device == "mock"
    }

    /// Inbound read timeout as a `Duration`
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

/// Monitored region in frame coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiSettings {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Default for RoiSettings {
    fn default() -> Self {
        Self {
            x1: 100,
            y1: 100,
            x2: 500,
            y2: 400,
        }
    }
}

impl RoiSettings {
    /// Validate into a `Roi`
    pub fn to_roi(&self) -> Result<Roi, EvalError> {
        Roi::new(self.x1, self.y1, self.x2, self.y2)
    }
}

/// Complete monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub serial: SerialSettings,
    pub roi: RoiSettings,
    pub source: SourceConfig,
    pub detector: DetectorConfig,
    /// Telemetry log destination
    pub log_path: String,
    /// Bounded display update queue depth
    pub display_queue_depth: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            serial: SerialSettings::default(),
            roi: RoiSettings::default(),
            source: SourceConfig::default(),
            detector: DetectorConfig::default(),
            log_path: "blindspot_log.csv".to_string(),
            display_queue_depth: 64,
        }
    }
}

impl MonitorConfig {
    /// Load from the default config file (optional) and `BLINDSPOT_*`
    /// environment overrides
    pub fn load() -> Result<Self, MonitorError> {
        Self::load_from(DEFAULT_CONFIG_NAME)
    }

    /// Load from a specific config file path plus environment overrides
    pub fn load_from(path: &str) -> Result<Self, MonitorError> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(::config::Environment::with_prefix("BLINDSPOT").separator("__"))
            .build()?;

        let config: MonitorConfig = settings.try_deserialize()?;
        info!(
            "loaded configuration: device {}, roi ({},{})-({},{})",
            config.serial.device, config.roi.x1, config.roi.y1, config.roi.x2, config.roi.y2
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bench_setup() {
        let config = MonitorConfig::default();
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.serial.read_timeout(), Duration::from_secs(1));
        assert_eq!(
            (config.roi.x1, config.roi.y1, config.roi.x2, config.roi.y2),
            (100, 100, 500, 400)
        );
        assert!(config.roi.to_roi().is_ok());
    }

    #[test]
    fn test_missing_config_file_falls_back_to_defaults() {
        let config = MonitorConfig::load_from("no-such-config-file").unwrap();
        assert_eq!(config.log_path, "blindspot_log.csv");
        assert!(!config.serial.is_mock());
    }
}

use crate::logging::LoggingConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:9876";
pub const DEFAULT_SENSOR_COUNT: u32 = 2;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Values a `/probe` request falls back to when it leaves them out.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeDefaults {
    pub sensor_count: u32,
    pub timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for ProbeDefaults {
    fn default() -> Self {
        Self {
            sensor_count: DEFAULT_SENSOR_COUNT,
            timeout: DEFAULT_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ExporterConfig {
    pub listen_address: SocketAddr,
    pub probe: ProbeDefaults,
    pub logging: LoggingConfig,
}

/// On-disk JSON config. Every field is optional and CLI flags win.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub listen_address: Option<String>,
    pub default_count: Option<u32>,
    pub default_timeout_seconds: Option<f64>,
    pub max_body_bytes: Option<usize>,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_defaults_match_expected() {
        let defaults = ProbeDefaults::default();
        assert_eq!(defaults.sensor_count, 2);
        assert_eq!(defaults.timeout, Duration::from_secs(60));
        assert_eq!(defaults.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn file_config_fields_are_optional() {
        let parsed: FileConfig = serde_json::from_str("{\"default_count\": 4}").expect("parse");
        assert_eq!(parsed.default_count, Some(4));
        assert_eq!(parsed.listen_address, None);
        assert_eq!(parsed.log_json, None);
    }

    #[test]
    fn file_config_rejects_unknown_fields() {
        assert!(serde_json::from_str::<FileConfig>("{\"sensors\": 4}").is_err());
    }
}

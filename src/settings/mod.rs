use crate::config::{
    DEFAULT_LISTEN_ADDRESS, DEFAULT_MAX_BODY_BYTES, DEFAULT_SENSOR_COUNT, DEFAULT_TIMEOUT,
    ExporterConfig, FileConfig, ProbeDefaults,
};
use crate::logging::{DEFAULT_LOG_LEVEL, LoggingConfig};
use clap::Parser;
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "pcsensor-exporter")]
#[command(about = "Prometheus exporter for PCsensor temperature status pages", long_about = None)]
pub struct CliArgs {
    /// Address to listen on [default: 0.0.0.0:9876]
    #[arg(long, value_name = "ADDR")]
    listen_address: Option<String>,

    /// Sensor count used when a probe omits `count` [default: 2]
    #[arg(long, value_name = "N")]
    default_count: Option<u32>,

    /// Probe timeout in seconds when no scrape timeout header is sent [default: 60]
    #[arg(long, value_name = "SECONDS")]
    default_timeout: Option<f64>,

    /// Largest status page accepted, in bytes; an oversized page reports
    /// probe_success 0. 0 disables the limit [default: 1048576]
    #[arg(long, value_name = "BYTES")]
    max_body_bytes: Option<usize>,

    /// JSON config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter directive; RUST_LOG takes precedence [default: info]
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid listen address {value:?}")]
    InvalidListenAddress { value: String },
    #[error("default sensor count must be greater than zero (got {value})")]
    InvalidSensorCount { value: u32 },
    #[error("default timeout must be a positive number of seconds (got {value})")]
    InvalidTimeout { value: f64 },
}

pub fn load_from_cli() -> Result<ExporterConfig, SettingsError> {
    let args = CliArgs::parse();
    from_args(args)
}

pub fn from_args(args: CliArgs) -> Result<ExporterConfig, SettingsError> {
    let file = match &args.config {
        Some(path) => load_file(path)?,
        None => FileConfig::default(),
    };
    resolve(args, file)
}

pub fn load_file(path: &Path) -> Result<FileConfig, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| SettingsError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

fn resolve(args: CliArgs, file: FileConfig) -> Result<ExporterConfig, SettingsError> {
    let listen = args
        .listen_address
        .or(file.listen_address)
        .unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_string());
    let listen_address = listen
        .parse::<SocketAddr>()
        .map_err(|_| SettingsError::InvalidListenAddress { value: listen })?;

    let sensor_count = args
        .default_count
        .or(file.default_count)
        .unwrap_or(DEFAULT_SENSOR_COUNT);
    if sensor_count == 0 {
        return Err(SettingsError::InvalidSensorCount {
            value: sensor_count,
        });
    }

    let timeout = match args.default_timeout.or(file.default_timeout_seconds) {
        Some(seconds) => parse_timeout(seconds)?,
        None => DEFAULT_TIMEOUT,
    };

    let max_body_bytes = args
        .max_body_bytes
        .or(file.max_body_bytes)
        .unwrap_or(DEFAULT_MAX_BODY_BYTES);

    Ok(ExporterConfig {
        listen_address,
        probe: ProbeDefaults {
            sensor_count,
            timeout,
            max_body_bytes,
        },
        logging: LoggingConfig {
            level: args
                .log_level
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            json: args.log_json || file.log_json.unwrap_or(false),
        },
    })
}

fn parse_timeout(seconds: f64) -> Result<Duration, SettingsError> {
    if seconds.is_nan() || seconds <= 0.0 {
        return Err(SettingsError::InvalidTimeout { value: seconds });
    }
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| SettingsError::InvalidTimeout { value: seconds })
}

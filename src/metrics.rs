use crate::probe::ProbeResult;
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::string::FromUtf8Error;
use thiserror::Error;

/// Content type of rendered snapshots.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

pub const TEMPERATURE_METRIC: &str = "probe_pcsensors_temperature_celcius";
pub const SENSOR_LABEL: &str = "probe";

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metric registry error: {0}")]
    Registry(#[from] prometheus::Error),
    #[error("rendered metrics are not valid utf-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// Gauges for exactly one probe, held in a registry nothing else sees.
///
/// Built fresh for every `/probe` request and consumed by [`ProbeMetrics::render`].
pub struct ProbeMetrics {
    registry: Registry,
    success: Gauge,
    duration: Gauge,
    temperature: GaugeVec,
}

impl ProbeMetrics {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();
        let success = Gauge::new(
            "probe_success",
            "Displays whether or not the probe was a success",
        )?;
        let duration = Gauge::new(
            "probe_duration_seconds",
            "Returns how long the probe took to complete in seconds",
        )?;
        let temperature = GaugeVec::new(
            Opts::new(
                TEMPERATURE_METRIC,
                "Temperature detected by pcsensors probe in celcius",
            ),
            &[SENSOR_LABEL],
        )?;

        registry.register(Box::new(success.clone()))?;
        registry.register(Box::new(duration.clone()))?;
        registry.register(Box::new(temperature.clone()))?;

        Ok(Self {
            registry,
            success,
            duration,
            temperature,
        })
    }

    pub fn record(&self, result: &ProbeResult) {
        self.duration.set(result.duration.as_secs_f64());
        self.success.set(if result.success { 1.0 } else { 0.0 });
        for reading in &result.readings {
            self.temperature
                .with_label_values(&[reading.label().as_str()])
                .set(reading.value);
        }
    }

    pub fn render(self) -> Result<String, MetricsError> {
        encode(&self.registry)
    }
}

/// Process-wide registry served on `/metrics`. Probes never write to it.
pub struct ExporterMetrics {
    registry: Registry,
}

impl ExporterMetrics {
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();
        let dummy = Gauge::new(
            "dummy_metric",
            "Shows whether a dummy has occurred in our cluster",
        )?;
        registry.register(Box::new(dummy.clone()))?;
        dummy.set(0.0);
        Ok(Self { registry })
    }

    pub fn render(&self) -> Result<String, MetricsError> {
        encode(&self.registry)
    }
}

fn encode(registry: &Registry) -> Result<String, MetricsError> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

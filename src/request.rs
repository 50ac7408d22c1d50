use crate::config::ProbeDefaults;
use crate::probe::ProbeRequest;
use axum::http::HeaderMap;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Header Prometheus uses to announce its scrape timeout.
pub const SCRAPE_TIMEOUT_HEADER: &str = "X-Prometheus-Scrape-Timeout-Seconds";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Target parameter is missing")]
    MissingTarget,
    #[error("Failed to parse timeout from Prometheus header: {0}")]
    InvalidTimeout(String),
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProbeParams {
    pub target: Option<String>,
    pub count: Option<String>,
}

/// Resolves query parameters and headers into a [`ProbeRequest`].
///
/// The timeout header is validated before the target, so a malformed header
/// is reported even when the target is also missing.
pub fn parse_probe_request(
    params: &ProbeParams,
    headers: &HeaderMap,
    defaults: &ProbeDefaults,
) -> Result<ProbeRequest, RequestError> {
    let timeout = scrape_timeout(headers, defaults.timeout)?;

    let target = params
        .target
        .as_deref()
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .ok_or(RequestError::MissingTarget)?;

    Ok(ProbeRequest {
        target: target.to_string(),
        sensor_count: sensor_count(params.count.as_deref(), defaults.sensor_count),
        timeout,
    })
}

/// Absent, empty and non-positive values fall back to `default`.
pub fn scrape_timeout(headers: &HeaderMap, default: Duration) -> Result<Duration, RequestError> {
    let Some(value) = headers.get(SCRAPE_TIMEOUT_HEADER) else {
        return Ok(default);
    };
    let raw = value
        .to_str()
        .map_err(|err| RequestError::InvalidTimeout(err.to_string()))?
        .trim();
    if raw.is_empty() {
        return Ok(default);
    }

    let seconds = raw
        .parse::<f64>()
        .map_err(|err| RequestError::InvalidTimeout(format!("{raw:?}: {err}")))?;
    if seconds.is_nan() {
        return Err(RequestError::InvalidTimeout(format!("{raw:?} is not a number")));
    }
    if seconds <= 0.0 {
        return Ok(default);
    }

    Duration::try_from_secs_f64(seconds)
        .map_err(|err| RequestError::InvalidTimeout(format!("{raw:?}: {err}")))
}

/// Anything other than a positive integer yields `default`.
pub fn sensor_count(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|count| *count > 0)
        .unwrap_or(default)
}

mod client;
mod helpers;

pub use client::{CurlFetcher, Fetch};

use self::helpers::context_error;

use crate::common::context::ProbeContext;
use crate::common::net::status_page_url;
use crate::extract::{ExtractError, SensorExtractor};
use crate::probe::{ProbeError, ProbeErrorKind, SensorReading};
use tracing::{debug, trace, warn};

/// Runs one fetch-and-extract pass against a target's status page.
pub struct ProbeEngine<F> {
    fetcher: F,
}

impl<F: Fetch> ProbeEngine<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Sensors without a marker are skipped. A marker with a malformed
    /// number fails the whole probe and drops every reading collected so far.
    /// The context is checked before every sensor, so a large count still
    /// ends at the deadline.
    pub fn run(
        &mut self,
        ctx: &ProbeContext,
        target: &str,
        sensor_count: u32,
    ) -> Result<Vec<SensorReading>, ProbeError> {
        debug!(address = target, sensor_count, "probing target");

        let url = status_page_url(target).ok_or_else(|| {
            ProbeError::new(
                ProbeErrorKind::InvalidTarget,
                format!("cannot build status page url for {target:?}"),
            )
        })?;
        let extractor = SensorExtractor::new(sensor_count)
            .map_err(|err| ProbeError::new(ProbeErrorKind::Internal, err.to_string()))?;

        let body = self.fetcher.fetch(ctx, &url)?;
        let body = String::from_utf8_lossy(&body);

        let mut readings = Vec::new();
        for sensor in 1..=sensor_count {
            if ctx.is_done() {
                return Err(context_error(ctx));
            }
            match extractor.extract(&body, sensor) {
                Ok(Some(reading)) => readings.push(reading),
                Ok(None) => trace!(sensor, "no marker for sensor"),
                Err(err @ ExtractError::MalformedValue { .. }) => {
                    warn!(address = target, error = %err, "discarding probe readings");
                    return Err(ProbeError::new(
                        ProbeErrorKind::MalformedReading,
                        err.to_string(),
                    ));
                }
                Err(err) => {
                    return Err(ProbeError::new(ProbeErrorKind::Internal, err.to_string()));
                }
            }
        }

        Ok(readings)
    }
}

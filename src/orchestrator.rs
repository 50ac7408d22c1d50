use crate::common::context::ProbeContext;
use crate::metrics::{MetricsError, ProbeMetrics};
use crate::probe::{ProbeError, ProbeErrorKind, ProbeRequest, ProbeResult};
use crate::probe_engine::{CurlFetcher, Fetch, ProbeEngine};
use std::time::Instant;
use tracing::{debug, error};

/// Runs one probe and renders its isolated metric snapshot.
pub async fn probe(request: ProbeRequest, max_body_bytes: usize) -> Result<String, MetricsError> {
    let metrics = ProbeMetrics::new()?;
    let result = execute(&request, move || {
        CurlFetcher::new(max_body_bytes).map_err(|err| {
            ProbeError::new(
                ProbeErrorKind::ClientInit,
                format!("failed to create curl handle: {err}"),
            )
        })
    })
    .await;

    log_result(&request, &result);
    metrics.record(&result);
    metrics.render()
}

/// Runs the engine on the blocking pool under a context bound to the
/// request timeout.
///
/// Dropping the returned future cancels the context, which aborts an
/// in-flight transfer.
pub async fn execute<F, M>(request: &ProbeRequest, make_fetcher: M) -> ProbeResult
where
    F: Fetch + 'static,
    M: FnOnce() -> Result<F, ProbeError> + Send + 'static,
{
    let ctx = ProbeContext::with_timeout(request.timeout);
    let _guard = ctx.cancel_on_drop();

    let worker_ctx = ctx.clone();
    let target = request.target.clone();
    let sensor_count = request.sensor_count;

    let start = Instant::now();
    let outcome = tokio::task::spawn_blocking(move || {
        let mut engine = ProbeEngine::new(make_fetcher()?);
        engine.run(&worker_ctx, &target, sensor_count)
    })
    .await
    .unwrap_or_else(|err| {
        Err(ProbeError::new(
            ProbeErrorKind::Internal,
            format!("probe worker failed: {err}"),
        ))
    });

    ProbeResult::from_outcome(outcome, start.elapsed())
}

fn log_result(request: &ProbeRequest, result: &ProbeResult) {
    let seconds = result.duration.as_secs_f64();
    match &result.error {
        None => debug!(
            address = %request.target,
            duration_seconds = seconds,
            readings = result.readings.len(),
            "probe succeeded"
        ),
        Some(err) => error!(
            address = %request.target,
            duration_seconds = seconds,
            kind = err.kind.label(),
            error = %err.message,
            "probe failed"
        ),
    }
}

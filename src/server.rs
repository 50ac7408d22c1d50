use crate::config::{ExporterConfig, ProbeDefaults};
use crate::metrics::{CONTENT_TYPE, ExporterMetrics, MetricsError};
use crate::orchestrator;
use crate::request::{ProbeParams, RequestError, parse_probe_request};
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

const LANDING_PAGE: &str = "<html><head><title>PCSensor Exporter</title></head><body>\
<h1>PCSensor Exporter</h1>\
<form action='/probe'>Target IP : <input name='target'>&nbsp;<input type='submit'></form>\
</body></html>";

#[derive(Clone)]
pub struct AppState {
    defaults: Arc<ProbeDefaults>,
    exporter: Arc<ExporterMetrics>,
}

impl AppState {
    pub fn new(defaults: ProbeDefaults) -> Result<Self, MetricsError> {
        Ok(Self {
            defaults: Arc::new(defaults),
            exporter: Arc::new(ExporterMetrics::new()?),
        })
    }
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match &self {
            HandlerError::Request(RequestError::MissingTarget) => StatusCode::BAD_REQUEST,
            HandlerError::Request(RequestError::InvalidTimeout(_)) | HandlerError::Metrics(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        warn!(%status, error = %self, "request failed");
        (status, self.to_string()).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/probe", get(probe_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

async fn probe_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ProbeParams>,
) -> Result<Response, HandlerError> {
    let request = parse_probe_request(&params, &headers, &state.defaults)?;
    let body = orchestrator::probe(request, state.defaults.max_body_bytes).await?;
    Ok(exposition(body))
}

async fn metrics_handler(State(state): State<AppState>) -> Result<Response, HandlerError> {
    let body = state.exporter.render()?;
    Ok(exposition(body))
}

fn exposition(body: String) -> Response {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}

/// Binds the listener and serves until ctrl-c.
pub async fn serve(config: ExporterConfig) -> io::Result<()> {
    let state = AppState::new(config.probe)
        .map_err(|err| io::Error::other(err.to_string()))?;
    let listener = TcpListener::bind(config.listen_address).await?;
    info!(address = %listener.local_addr()?, "beginning to serve");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

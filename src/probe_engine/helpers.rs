use crate::common::context::ProbeContext;
use crate::probe::{ProbeError, ProbeErrorKind};
use curl::Error as CurlError;

pub(super) fn map_curl_error(
    err: &CurlError,
    ctx: &ProbeContext,
    limit_reached: bool,
    limit: usize,
) -> ProbeError {
    if limit_reached && err.is_write_error() {
        return ProbeError::new(
            ProbeErrorKind::BodyTooLarge,
            format!("status page exceeds {limit} bytes"),
        );
    }
    if err.is_aborted_by_callback() {
        return context_error(ctx);
    }

    let kind = if err.is_operation_timedout() {
        ProbeErrorKind::Timeout
    } else if err.is_couldnt_resolve_host() || err.is_couldnt_resolve_proxy() {
        ProbeErrorKind::Dns
    } else if err.is_couldnt_connect() {
        ProbeErrorKind::Connect
    } else if err.is_url_malformed() || err.is_unsupported_protocol() {
        ProbeErrorKind::InvalidTarget
    } else if is_body_read_error(err) {
        ProbeErrorKind::BodyRead
    } else {
        ProbeErrorKind::Connect
    };

    ProbeError::new(kind, err.to_string())
}

fn is_body_read_error(err: &CurlError) -> bool {
    err.is_recv_error()
        || err.is_partial_file()
        || err.is_got_nothing()
        || err.is_read_error()
        || err.is_write_error()
        || err.is_bad_content_encoding()
}

/// Error for a context that ended before or during a transfer.
pub(super) fn context_error(ctx: &ProbeContext) -> ProbeError {
    if ctx.is_cancelled() {
        ProbeError::new(ProbeErrorKind::Cancelled, "probe cancelled by caller")
    } else {
        ProbeError::new(ProbeErrorKind::Timeout, "probe deadline exceeded")
    }
}

pub(super) fn client_error(err: &CurlError) -> ProbeError {
    ProbeError::new(
        ProbeErrorKind::ClientInit,
        format!("failed to configure curl: {err}"),
    )
}

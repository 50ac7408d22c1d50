use super::helpers::{client_error, context_error, map_curl_error};
use crate::common::context::ProbeContext;
use crate::probe::ProbeError;
use curl::Error as CurlError;
use curl::easy::{Easy2, Handler, WriteError};
use std::time::Duration;
use url::Url;

const MAX_CURL_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// Fetches a status page under a probe context.
pub trait Fetch {
    fn fetch(&mut self, ctx: &ProbeContext, url: &Url) -> Result<Vec<u8>, ProbeError>;
}

#[derive(Default)]
struct BodyCollector {
    body: Vec<u8>,
    limit: usize,
    limit_reached: bool,
    context: Option<ProbeContext>,
}

impl BodyCollector {
    fn reset(&mut self, limit: usize, context: Option<ProbeContext>) {
        self.body.clear();
        self.limit = limit;
        self.limit_reached = false;
        self.context = context;
    }
}

impl Handler for BodyCollector {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        if self.limit > 0 {
            let remaining = self.limit.saturating_sub(self.body.len());
            if data.len() > remaining {
                // A short write makes curl fail the transfer.
                self.limit_reached = true;
                return Ok(0);
            }
        }

        self.body.extend_from_slice(data);
        Ok(data.len())
    }

    fn progress(&mut self, _dltotal: f64, _dlnow: f64, _ultotal: f64, _ulnow: f64) -> bool {
        !self.context.as_ref().is_some_and(ProbeContext::is_done)
    }
}

/// libcurl-backed fetcher. A limit of 0 accepts bodies of any size.
pub struct CurlFetcher {
    easy: Easy2<BodyCollector>,
    max_body_bytes: usize,
}

impl CurlFetcher {
    pub fn new(max_body_bytes: usize) -> Result<Self, CurlError> {
        let mut easy = Easy2::new(BodyCollector::default());
        easy.signal(false)?;
        easy.follow_location(false)?;
        Ok(Self {
            easy,
            max_body_bytes,
        })
    }

    fn configure(&mut self, ctx: &ProbeContext, url: &Url) -> Result<(), CurlError> {
        self.easy.reset();
        self.easy
            .get_mut()
            .reset(self.max_body_bytes, Some(ctx.clone()));
        self.easy.signal(false)?;
        self.easy.follow_location(false)?;
        self.easy.get(true)?;
        self.easy.progress(true)?;
        // Loopback targets never go through a proxy.
        self.easy.noproxy("localhost,127.0.0.1,::1")?;
        self.easy.url(url.as_str())?;

        // Zero would disable curl's timeout entirely. Longer deadlines are
        // left to the progress callback.
        if let Some(remaining) = ctx.remaining() {
            self.easy
                .timeout(remaining.clamp(Duration::from_millis(1), MAX_CURL_TIMEOUT))?;
        }
        Ok(())
    }
}

impl Fetch for CurlFetcher {
    fn fetch(&mut self, ctx: &ProbeContext, url: &Url) -> Result<Vec<u8>, ProbeError> {
        if ctx.is_done() {
            return Err(context_error(ctx));
        }
        self.configure(ctx, url).map_err(|err| client_error(&err))?;

        let performed = self.easy.perform();
        let collector = self.easy.get_mut();
        let limit_reached = collector.limit_reached;
        let body = std::mem::take(&mut collector.body);
        collector.context = None;

        match performed {
            Ok(()) => Ok(body),
            Err(err) => Err(map_curl_error(&err, ctx, limit_reached, self.max_body_bytes)),
        }
    }
}

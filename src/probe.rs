use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// One resolved `/probe` call.
#[derive(Clone, Debug, PartialEq)]
pub struct ProbeRequest {
    pub target: String,
    pub sensor_count: u32,
    pub timeout: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorReading {
    pub sensor: u32,
    pub value: f64,
}

impl SensorReading {
    /// Label value published for this sensor, e.g. `T1`.
    pub fn label(&self) -> String {
        format!("T{}", self.sensor)
    }
}

#[derive(Clone, Debug)]
pub struct ProbeResult {
    pub success: bool,
    pub duration: Duration,
    pub readings: Vec<SensorReading>,
    pub error: Option<ProbeError>,
}

impl ProbeResult {
    pub fn from_outcome(
        outcome: Result<Vec<SensorReading>, ProbeError>,
        duration: Duration,
    ) -> Self {
        match outcome {
            Ok(readings) => Self {
                success: true,
                duration,
                readings,
                error: None,
            },
            Err(err) => Self {
                success: false,
                duration,
                readings: Vec::new(),
                error: Some(err),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ProbeErrorKind {
    InvalidTarget,
    Dns,
    Connect,
    Timeout,
    Cancelled,
    BodyRead,
    BodyTooLarge,
    MalformedReading,
    ClientInit,
    Internal,
}

impl ProbeErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProbeErrorKind::InvalidTarget => "invalid_target",
            ProbeErrorKind::Dns => "dns",
            ProbeErrorKind::Connect => "connect",
            ProbeErrorKind::Timeout => "timeout",
            ProbeErrorKind::Cancelled => "cancelled",
            ProbeErrorKind::BodyRead => "body_read",
            ProbeErrorKind::BodyTooLarge => "body_too_large",
            ProbeErrorKind::MalformedReading => "malformed_reading",
            ProbeErrorKind::ClientInit => "client_init",
            ProbeErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, Error)]
#[error("{kind}: {message}")]
pub struct ProbeError {
    pub kind: ProbeErrorKind,
    pub message: String,
}

impl ProbeError {
    pub fn new(kind: ProbeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

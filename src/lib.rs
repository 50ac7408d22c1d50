mod common;

pub mod config;
pub mod extract;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod probe;
pub mod probe_engine;
pub mod request;
pub mod server;
pub mod settings;

pub use common::context::{CancelGuard, ProbeContext};

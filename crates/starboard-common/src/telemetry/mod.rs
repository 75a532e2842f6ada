//! Telemetry: tracing setup and the in-memory monitor

mod monitor;
mod tracing_setup;

pub use monitor::{Monitor, MonitorStats};
pub use tracing_setup::{
    init_tracing, try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};

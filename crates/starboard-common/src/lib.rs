//! # starboard-common
//!
//! Shared utilities including configuration, error handling, telemetry, and
//! the in-memory monitor.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, DiscordConfig, Environment,
    MonitorConfig, SettingsHandle, StarboardConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{
    init_tracing, try_init_tracing, try_init_tracing_with_config, Monitor, MonitorStats,
    TracingConfig, TracingError,
};

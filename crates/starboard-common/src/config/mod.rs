//! Configuration structs

mod app_config;
mod settings;

pub use app_config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, DiscordConfig, Environment,
    MonitorConfig, StarboardConfig,
};
pub use settings::SettingsHandle;

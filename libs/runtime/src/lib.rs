//! Process-level runtime support shared by every binary in the workspace:
//! layered configuration loading and logging bootstrap.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    default_logging_config, AppConfig, AppConfigProvider, CliArgs, DatabaseConfig,
    LoggingConfig, Section, ServerConfig,
};

//! Process-level runtime concerns: configuration loading and logging
//! bootstrap, shared by the server binary.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LoggingConfig, ServerConfig};

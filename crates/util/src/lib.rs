//! Configuration, HTTP body parsing and text helpers shared by the console crates.

pub mod config;
pub mod http;
pub mod text_processing;

pub use config::{ConfigError, ConsoleConfig, OverlapPolicy, config_home};
pub use text_processing::{escape_control_chars, format_percent, format_usage, redact_args, redact_sensitive};

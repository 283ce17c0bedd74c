//! Configuration loading and parsing
//!
//! Loads configuration from a TOML file or the embedded defaults.

pub mod loader;
pub mod toml;

pub use loader::{load_settings, EMBEDDED_CONFIG};
pub use toml::{parse_config, BootConfig, Settings};

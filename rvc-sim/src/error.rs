//! Simulator errors

use std::io;
use std::path::PathBuf;

use rvc_core::config::ConfigError;
use thiserror::Error;

pub type SimResult<T> = Result<T, SimError>;

/// Fatal simulator errors
///
/// All of these abort startup before the carriage accepts commands.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] LoadError),

    /// Simulated link could not be opened
    #[error("failed to open serial port {port}: {reason}")]
    Link { port: String, reason: &'static str },

    /// Standard stream failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration load errors
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// TOML did not parse into the settings schema
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are unusable
    #[error("invalid [sim] values: {0:?}")]
    Invalid(ConfigError),

    /// Boot section is unusable
    #[error("invalid [boot] values: {0}")]
    Boot(&'static str),
}

impl From<ConfigError> for LoadError {
    fn from(e: ConfigError) -> Self {
        LoadError::Invalid(e)
    }
}

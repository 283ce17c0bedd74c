//! TOML configuration schema
//!
//! ```toml
//! [boot]
//! port = "/dev/ttyUSB0"
//! settle_ms = 4000
//! frame_id = "rvc"
//!
//! [sim]
//! speed = 120.0
//! tick_ms = 20
//! # ...
//! ```

use serde::Deserialize;

use rvc_core::config::SimConfig;

use crate::error::LoadError;

/// Default device path the link reports
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Default settle delay after opening the link (ms)
pub const DEFAULT_SETTLE_MS: u64 = 4000;

/// Default joint-state frame id
pub const DEFAULT_FRAME_ID: &str = "rvc";

/// Longest accepted frame id
pub const MAX_FRAME_ID_LEN: usize = 32;

/// Startup settings outside the carriage model
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootConfig {
    /// Device the simulated link reports as opened
    pub port: String,
    /// Delay between opening the link and enabling motors (ms)
    pub settle_ms: u64,
    /// Frame id stamped on joint-state records
    pub frame_id: String,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.into(),
            settle_ms: DEFAULT_SETTLE_MS,
            frame_id: DEFAULT_FRAME_ID.into(),
        }
    }
}

impl BootConfig {
    fn validate(&self) -> Result<(), LoadError> {
        if self.port.trim().is_empty() {
            return Err(LoadError::Boot("port must not be empty"));
        }
        if self.frame_id.is_empty() || self.frame_id.len() > MAX_FRAME_ID_LEN {
            return Err(LoadError::Boot("frame_id must be 1-32 bytes"));
        }
        Ok(())
    }
}

/// Complete simulator settings
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub boot: BootConfig,
    pub sim: SimConfig,
}

/// Parse and validate settings from TOML text
pub fn parse_config(text: &str) -> Result<Settings, LoadError> {
    let settings: Settings = ::toml::from_str(text)?;
    settings.boot.validate()?;
    settings.sim.validate()?;
    Ok(settings)
}

//! Configuration loading
//!
//! Reads settings from a file given on the command line, or falls back to
//! the copy of `sim.toml` compiled into the binary.

use std::fs;
use std::path::Path;

use tracing::info;

use super::toml::{parse_config, Settings};
use crate::error::LoadError;

/// Embedded default configuration
/// Edit sim.toml and rebuild to change the defaults
pub const EMBEDDED_CONFIG: &str = include_str!("../../sim.toml");

/// Load settings from `path`, or the embedded defaults when `None`
pub fn load_settings(path: Option<&Path>) -> Result<Settings, LoadError> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let settings = parse_config(&text)?;
            info!("Loaded configuration from {}", path.display());
            Ok(settings)
        }
        None => {
            let settings = parse_config(EMBEDDED_CONFIG)?;
            info!("Using embedded configuration");
            Ok(settings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_matches_defaults() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_missing_file() {
        let result = load_settings(Some(Path::new("/nonexistent/rvc/sim.toml")));
        assert!(matches!(result, Err(LoadError::Read { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("rvc-sim-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[boot]\nframe_id = \"bench\"").unwrap();
        drop(file);

        let settings = load_settings(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(settings.boot.frame_id, "bench");
    }
}

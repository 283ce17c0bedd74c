//! Configuration type definitions
//!
//! These types hold every tunable of the simulated carriage. The host binary
//! deserializes them from TOML when the `serde` feature is enabled.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::Point;

/// Nominal top speed in position units per second
pub const DEFAULT_SPEED: f64 = 120.0;

/// Motion tick period in milliseconds
pub const DEFAULT_TICK_MS: u32 = 20;

/// Telemetry publication period in milliseconds
pub const DEFAULT_TELEMETRY_MS: u32 = 200;

/// Remaining distance at which an axis snaps onto its goal
pub const DEFAULT_SNAP_EPSILON: f64 = 2.4;

/// Time factor applied to every homing step
pub const DEFAULT_HOMING_STEP_S: f64 = 0.2;

/// X coordinate the third homing stage sweeps back to
pub const DEFAULT_HOMING_X_TURNAROUND: f64 = -80.0;

/// Homing extremes
pub const DEFAULT_X_BOUND: f64 = -580.0;
pub const DEFAULT_Y_BOUND: f64 = 300.0;

/// End effector hold time for a tap
pub const DEFAULT_TAP_HOLD_MS: u32 = 500;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Speed must be finite and positive
    InvalidSpeed,
    /// Tick period must be non-zero
    InvalidTick,
    /// Telemetry period must be a non-zero multiple of the tick period
    InvalidTelemetryPeriod,
    /// Snap epsilon must be finite and non-negative
    InvalidSnapEpsilon,
    /// One tick of travel must not exceed twice the snap epsilon, or motion
    /// oscillates around its goal
    SnapTooSmall,
    /// Homing step factor must be finite and positive
    InvalidHomingStep,
    /// Bounds and turnaround must be finite
    InvalidBounds,
}

/// Simulated carriage configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Nominal top speed (units/s) before velocity scaling
    pub speed: f64,
    /// Motion tick period (ms)
    pub tick_ms: u32,
    /// Telemetry publication period (ms)
    pub telemetry_ms: u32,
    /// Per-axis snap-to-goal distance
    pub snap_epsilon: f64,
    /// Homing step time factor (s); step = speed * scale * homing_step_s
    pub homing_step_s: f64,
    /// X coordinate of the third homing stage
    pub homing_x_turnaround: f64,
    /// Homing extremes
    pub bounds: Point,
    /// End effector hold time for a tap (ms)
    pub tap_hold_ms: u32,
    /// Freeze motion ticks while motors are disabled
    pub gate_motion_on_motors: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            tick_ms: DEFAULT_TICK_MS,
            telemetry_ms: DEFAULT_TELEMETRY_MS,
            snap_epsilon: DEFAULT_SNAP_EPSILON,
            homing_step_s: DEFAULT_HOMING_STEP_S,
            homing_x_turnaround: DEFAULT_HOMING_X_TURNAROUND,
            bounds: Point::new(DEFAULT_X_BOUND, DEFAULT_Y_BOUND),
            tap_hold_ms: DEFAULT_TAP_HOLD_MS,
            gate_motion_on_motors: false,
        }
    }
}

impl SimConfig {
    /// Check that every field is usable by the simulator
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed);
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::InvalidTick);
        }
        if self.telemetry_ms == 0 || self.telemetry_ms % self.tick_ms != 0 {
            return Err(ConfigError::InvalidTelemetryPeriod);
        }
        if !self.snap_epsilon.is_finite() || self.snap_epsilon < 0.0 {
            return Err(ConfigError::InvalidSnapEpsilon);
        }
        if self.speed * self.tick_s() > 2.0 * self.snap_epsilon {
            return Err(ConfigError::SnapTooSmall);
        }
        if !self.homing_step_s.is_finite() || self.homing_step_s <= 0.0 {
            return Err(ConfigError::InvalidHomingStep);
        }
        if !self.bounds.is_finite() || !self.homing_x_turnaround.is_finite() {
            return Err(ConfigError::InvalidBounds);
        }
        Ok(())
    }

    /// Motion tick period in seconds
    pub fn tick_s(&self) -> f64 {
        self.tick_ms as f64 / 1000.0
    }

    /// Number of motion ticks between telemetry records
    pub fn ticks_per_telemetry(&self) -> u32 {
        self.telemetry_ms / self.tick_ms.max(1)
    }

    /// Number of motion ticks a tap holds the end effector down
    ///
    /// Rounds up so a hold is never shorter than configured.
    pub fn tap_hold_ticks(&self) -> u32 {
        let tick = self.tick_ms.max(1);
        self.tap_hold_ms.div_ceil(tick).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.speed, 120.0);
        assert_eq!(config.bounds, Point::new(-580.0, 300.0));
    }

    #[test]
    fn test_derived_periods() {
        let config = SimConfig::default();
        assert_eq!(config.tick_s(), 0.02);
        assert_eq!(config.ticks_per_telemetry(), 10);
        assert_eq!(config.tap_hold_ticks(), 25);
    }

    #[test]
    fn test_tap_hold_rounds_up() {
        let config = SimConfig {
            tick_ms: 30,
            telemetry_ms: 300,
            tap_hold_ms: 500,
            ..Default::default()
        };
        // 500 / 30 = 16.67
        assert_eq!(config.tap_hold_ticks(), 17);

        let instant = SimConfig {
            tap_hold_ms: 0,
            ..Default::default()
        };
        assert_eq!(instant.tap_hold_ticks(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            (
                SimConfig {
                    speed: 0.0,
                    ..Default::default()
                },
                ConfigError::InvalidSpeed,
            ),
            (
                SimConfig {
                    speed: f64::NAN,
                    ..Default::default()
                },
                ConfigError::InvalidSpeed,
            ),
            (
                SimConfig {
                    tick_ms: 0,
                    ..Default::default()
                },
                ConfigError::InvalidTick,
            ),
            (
                SimConfig {
                    telemetry_ms: 210,
                    ..Default::default()
                },
                ConfigError::InvalidTelemetryPeriod,
            ),
            (
                SimConfig {
                    snap_epsilon: -1.0,
                    ..Default::default()
                },
                ConfigError::InvalidSnapEpsilon,
            ),
            (
                SimConfig {
                    speed: 500.0,
                    ..Default::default()
                },
                ConfigError::SnapTooSmall,
            ),
            (
                SimConfig {
                    homing_step_s: 0.0,
                    ..Default::default()
                },
                ConfigError::InvalidHomingStep,
            ),
            (
                SimConfig {
                    bounds: Point::new(f64::INFINITY, 300.0),
                    ..Default::default()
                },
                ConfigError::InvalidBounds,
            ),
        ];

        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn test_snap_epsilon_covers_one_tick() {
        // 240 * 0.02 = 4.8 = 2 * 2.4
        let edge = SimConfig {
            speed: 240.0,
            ..Default::default()
        };
        assert_eq!(edge.validate(), Ok(()));

        let fast = SimConfig {
            speed: 241.0,
            ..Default::default()
        };
        assert_eq!(fast.validate(), Err(ConfigError::SnapTooSmall));

        let no_snap = SimConfig {
            snap_epsilon: 0.0,
            ..Default::default()
        };
        assert_eq!(no_snap.validate(), Err(ConfigError::SnapTooSmall));
    }
}

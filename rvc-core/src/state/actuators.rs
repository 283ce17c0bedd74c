//! Actuator flags and velocity scale
//!
//! Pure state holders. The three flags are independent of each other.

/// On/off state of the carriage actuators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorState {
    /// Stepper drivers energized
    pub motors_on: bool,
    /// End effector pressed down
    pub endeff_down: bool,
    /// Status LED lit
    pub led_on: bool,
}

/// Multiplier on the nominal top speed, always within `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VelocityScale(f64);

impl Default for VelocityScale {
    fn default() -> Self {
        Self::FULL
    }
}

impl VelocityScale {
    /// Full nominal speed
    pub const FULL: VelocityScale = VelocityScale(1.0);

    /// Create a scale, clamping into range
    ///
    /// NaN carries no usable value and maps to `None`.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else {
            Some(Self(value.clamp(0.0, 1.0)))
        }
    }

    /// Clamp and store a new value, ignoring NaN
    pub fn set(&mut self, value: f64) {
        if let Some(scale) = Self::new(value) {
            *self = scale;
        }
    }

    /// Effective scale
    pub fn get(self) -> f64 {
        self.0
    }
}

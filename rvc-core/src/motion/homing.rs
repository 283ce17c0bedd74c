//! Homing sequence
//!
//! Re-establishes the carriage origin by sweeping each axis through known
//! extremes. The sequence is a tick-driven state machine: every call to
//! [`HomingSequence::advance`] performs exactly one action, either a single
//! step toward the current stage target or the clamp that finishes the
//! stage. Homing writes position directly and bypasses the motion simulator.
//!
//! The sweep leaves x at the turnaround point. A final settle phase carries
//! the carriage from there to the origin at normal motion speed, and the
//! sequence only completes once the origin is reached exactly.
//!
//! Stage order:
//!
//! | Stage             | Axis | Direction | Target       |
//! |-------------------|------|-----------|--------------|
//! | `SeekXBound`      | x    | decrease  | `x_bound`    |
//! | `ReturnXZero`     | x    | increase  | `0`          |
//! | `SeekXTurnaround` | x    | decrease  | turnaround   |
//! | `SeekYBound`      | y    | increase  | `y_bound`    |
//! | `ReturnYZero`     | y    | decrease  | `0`          |

use super::position::{Axis, Point};
use super::simulator::MotionSimulator;
use crate::config::SimConfig;

/// Smallest per-step distance a sequence may start with
pub const MIN_HOMING_STEP: f64 = 0.01;

/// Homing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingStage {
    /// Drive x down to its bound
    SeekXBound,
    /// Drive x back up to zero
    ReturnXZero,
    /// Drive x down to the turnaround point
    SeekXTurnaround,
    /// Drive y up to its bound
    SeekYBound,
    /// Drive y back down to zero
    ReturnYZero,
}

impl HomingStage {
    /// First stage of the sequence
    pub const FIRST: HomingStage = HomingStage::SeekXBound;

    /// Axis moved by this stage
    pub fn axis(self) -> Axis {
        match self {
            HomingStage::SeekXBound | HomingStage::ReturnXZero | HomingStage::SeekXTurnaround => {
                Axis::X
            }
            HomingStage::SeekYBound | HomingStage::ReturnYZero => Axis::Y,
        }
    }

    /// True if this stage moves in the positive direction
    pub fn is_increasing(self) -> bool {
        matches!(self, HomingStage::ReturnXZero | HomingStage::SeekYBound)
    }

    /// Stage that follows this one
    pub fn next(self) -> Option<Self> {
        match self {
            HomingStage::SeekXBound => Some(HomingStage::ReturnXZero),
            HomingStage::ReturnXZero => Some(HomingStage::SeekXTurnaround),
            HomingStage::SeekXTurnaround => Some(HomingStage::SeekYBound),
            HomingStage::SeekYBound => Some(HomingStage::ReturnYZero),
            HomingStage::ReturnYZero => None,
        }
    }

    /// Zero-based position in the sequence
    pub fn index(self) -> u8 {
        match self {
            HomingStage::SeekXBound => 0,
            HomingStage::ReturnXZero => 1,
            HomingStage::SeekXTurnaround => 2,
            HomingStage::SeekYBound => 3,
            HomingStage::ReturnYZero => 4,
        }
    }
}

/// Reasons a homing request is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingError {
    /// Motors are disabled
    MotorsDisabled,
    /// A homing sequence is already running
    AlreadyHoming,
    /// Step size below [`MIN_HOMING_STEP`], the sweep would never finish
    VelocityTooLow,
}

impl HomingError {
    /// Message reported to the caller
    pub fn message(self) -> &'static str {
        match self {
            HomingError::MotorsDisabled => "Failed to home.",
            HomingError::AlreadyHoming => "Homing already in progress",
            HomingError::VelocityTooLow => "Failed to home: velocity scale too low",
        }
    }
}

/// Homing phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingPhase {
    /// Sweeping through the stage extremes
    Sweep(HomingStage),
    /// Returning from the last extreme to the origin
    Settle,
}

/// Result of one homing tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomingProgress {
    /// No sequence is running
    Idle,
    /// Moved one step within the current stage
    Stepped,
    /// Clamped onto the stage target; more stages follow
    StageComplete(HomingStage),
    /// Final stage clamped; the origin is now the goal
    SweepComplete,
    /// Moved one tick toward the origin
    Settling,
    /// Carriage is exactly at the origin
    Complete,
}

/// Homing stage targets
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HomingTargets {
    /// Axis extremes
    pub bounds: Point,
    /// X coordinate of the turnaround stage
    pub x_turnaround: f64,
}

impl HomingTargets {
    /// Target coordinate for a stage
    pub fn target(&self, stage: HomingStage) -> f64 {
        match stage {
            HomingStage::SeekXBound => self.bounds.x,
            HomingStage::ReturnXZero => 0.0,
            HomingStage::SeekXTurnaround => self.x_turnaround,
            HomingStage::SeekYBound => self.bounds.y,
            HomingStage::ReturnYZero => 0.0,
        }
    }
}

/// Homing state machine
#[derive(Debug, Clone)]
pub struct HomingSequence {
    targets: HomingTargets,
    /// Nominal top speed (units/s)
    speed: f64,
    /// Time factor per step (s)
    step_s: f64,
    /// Integrator for the settle phase
    settle: MotionSimulator,
    /// Current phase, `None` when idle
    phase: Option<HomingPhase>,
}

impl HomingSequence {
    /// Create an idle sequence from the carriage configuration
    pub fn new(config: &SimConfig) -> Self {
        Self {
            targets: HomingTargets {
                bounds: config.bounds,
                x_turnaround: config.homing_x_turnaround,
            },
            speed: config.speed,
            step_s: config.homing_step_s,
            settle: MotionSimulator::from_config(config),
            phase: None,
        }
    }

    /// Stage targets
    pub fn targets(&self) -> &HomingTargets {
        &self.targets
    }

    /// Current phase, if running
    pub fn phase(&self) -> Option<HomingPhase> {
        self.phase
    }

    /// Current sweep stage, if sweeping
    pub fn stage(&self) -> Option<HomingStage> {
        match self.phase {
            Some(HomingPhase::Sweep(stage)) => Some(stage),
            _ => None,
        }
    }

    /// Check if a sequence is running
    pub fn is_active(&self) -> bool {
        self.phase.is_some()
    }

    /// Distance covered by one step at the given velocity scale
    pub fn step_size(&self, scale: f64) -> f64 {
        self.speed * scale * self.step_s
    }

    /// Begin the sequence
    ///
    /// Nothing is mutated when the request is refused.
    pub fn start(&mut self, motors_on: bool, scale: f64) -> Result<(), HomingError> {
        if self.is_active() {
            return Err(HomingError::AlreadyHoming);
        }
        if !motors_on {
            return Err(HomingError::MotorsDisabled);
        }
        if !(self.step_size(scale) >= MIN_HOMING_STEP) {
            return Err(HomingError::VelocityTooLow);
        }
        self.phase = Some(HomingPhase::Sweep(HomingStage::FIRST));
        Ok(())
    }

    /// Perform one homing action on `position`
    ///
    /// Velocity scale is read on every call so changes apply from the next
    /// step.
    pub fn advance(&mut self, position: &mut Point, scale: f64) -> HomingProgress {
        match self.phase {
            None => HomingProgress::Idle,
            Some(HomingPhase::Sweep(stage)) => self.sweep(stage, position, scale),
            Some(HomingPhase::Settle) => self.settle(position, scale),
        }
    }

    fn sweep(&mut self, stage: HomingStage, position: &mut Point, scale: f64) -> HomingProgress {
        let axis = stage.axis();
        let target = self.targets.target(stage);
        let value = position.get(axis);

        let reached = if stage.is_increasing() {
            value >= target
        } else {
            value <= target
        };

        if reached {
            position.set(axis, target);
            return match stage.next() {
                Some(next) => {
                    self.phase = Some(HomingPhase::Sweep(next));
                    HomingProgress::StageComplete(stage)
                }
                None => {
                    self.phase = Some(HomingPhase::Settle);
                    HomingProgress::SweepComplete
                }
            };
        }

        let step = self.step_size(scale);
        if stage.is_increasing() {
            position.set(axis, value + step);
        } else {
            position.set(axis, value - step);
        }
        HomingProgress::Stepped
    }

    fn settle(&mut self, position: &mut Point, scale: f64) -> HomingProgress {
        if *position != Point::ORIGIN {
            *position = self.settle.step(*position, Point::ORIGIN, scale);
        }
        if *position == Point::ORIGIN {
            self.phase = None;
            HomingProgress::Complete
        } else {
            HomingProgress::Settling
        }
    }
}

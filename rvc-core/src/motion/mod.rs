//! Carriage motion
//!
//! Straight-line goal seeking for normal operation and the homing sweep
//! that re-establishes the origin.

pub mod homing;
pub mod position;
pub mod simulator;

pub use homing::{
    HomingError, HomingPhase, HomingProgress, HomingSequence, HomingStage, MIN_HOMING_STEP,
};
pub use position::{Axis, Point};
pub use simulator::{MotionSimulator, MotionState, Velocity};

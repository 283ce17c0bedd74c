//! Events produced by machine ticks

use crate::motion::{HomingStage, Point};

/// Maximum events a single tick can produce
pub const MAX_TICK_EVENTS: usize = 4;

/// Events emitted while advancing the machine
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Motion events
    /// Position converged exactly onto the goal
    GoalReached(Point),

    // Homing events
    /// A homing stage clamped onto its extreme
    HomingStageComplete(HomingStage),
    /// Homing sweep finished; goal reset to the origin
    HomingSweepComplete,
    /// Homing finished with the carriage at the origin
    Homed,

    // Actuator events
    /// Tap hold ended, end effector released
    TapReleased,
}

impl Event {
    /// Check if this event completes a pending homing request
    pub fn is_homing_result(&self) -> bool {
        matches!(self, Event::Homed)
    }

    /// Check if this event should be published on the goal channel
    pub fn is_goal_event(&self) -> bool {
        matches!(self, Event::GoalReached(_))
    }

    /// Check if this event is homing progress
    pub fn is_homing_event(&self) -> bool {
        matches!(
            self,
            Event::HomingStageComplete(_) | Event::HomingSweepComplete | Event::Homed
        )
    }
}

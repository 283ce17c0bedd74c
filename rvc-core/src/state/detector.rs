//! Goal-reached detection
//!
//! Fires once per convergence episode. Any goal mutation re-arms it.

use crate::motion::Point;

/// One-shot goal-reached detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GoalReachedDetector {
    /// Reached already notified for the current episode
    reported: bool,
}

impl Default for GoalReachedDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl GoalReachedDetector {
    /// Create a detector with nothing to report until the first goal change
    pub fn new() -> Self {
        Self { reported: true }
    }

    /// Start a new convergence episode
    pub fn rearm(&mut self) {
        self.reported = false;
    }

    /// Check if the current episode has already been reported
    pub fn is_reported(&self) -> bool {
        self.reported
    }

    /// Observe one tick of output
    ///
    /// Returns true exactly once per episode, on the first tick where
    /// position equals goal.
    pub fn observe(&mut self, position: Point, goal: Point) -> bool {
        if !self.reported && position == goal {
            self.reported = true;
            true
        } else {
            false
        }
    }
}

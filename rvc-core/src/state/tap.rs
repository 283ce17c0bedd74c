//! Timed end effector tap
//!
//! A tap presses the end effector, holds it for a fixed number of ticks and
//! releases it. Tapping again while held restarts the hold.

/// Tap hold timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TapTimer {
    /// Ticks left until release, `None` when not holding
    remaining: Option<u32>,
}

impl TapTimer {
    /// Create an idle timer
    pub fn new() -> Self {
        Self { remaining: None }
    }

    /// Begin (or restart) a hold of `hold_ticks` ticks
    pub fn press(&mut self, hold_ticks: u32) {
        self.remaining = Some(hold_ticks.max(1));
    }

    /// Check if a hold is in progress
    pub fn is_holding(&self) -> bool {
        self.remaining.is_some()
    }

    /// Ticks left until release
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    /// Count one tick; returns true on the tick that ends the hold
    pub fn tick(&mut self) -> bool {
        match self.remaining {
            Some(left) if left <= 1 => {
                self.remaining = None;
                true
            }
            Some(left) => {
                self.remaining = Some(left - 1);
                false
            }
            None => false,
        }
    }
}

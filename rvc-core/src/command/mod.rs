//! Command surface
//!
//! Translates external requests into goal, actuator and homing changes.
//! Every command returns immediately. `tap` and `home` complete on later
//! ticks; their callers get [`Reply::Pending`] and the final result arrives
//! as a tick event.

pub mod surface;

/// Requests accepted by the machine
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Shift the goal by a relative offset
    Move { dx: f64, dy: f64 },
    /// Replace the goal
    MoveTo { x: f64, y: f64 },
    /// Set the velocity scale (clamped into `[0, 1]`)
    VelocityScale(f64),
    /// Stop at the current position
    Halt,
    /// Press and release the end effector
    Tap,
    /// Run the homing sequence
    Home,
    /// Press (`true`) or release the end effector
    SetEndEffector(bool),
    /// Light or darken the status LED
    SetLed(bool),
    /// Enable or disable the motors
    SetMotors(bool),
}

impl Command {
    /// Check if this command changes the goal
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            Command::Move { .. } | Command::MoveTo { .. } | Command::Halt
        )
    }

    /// Check if this command finishes on a later tick
    pub fn is_deferred(&self) -> bool {
        matches!(self, Command::Tap | Command::Home)
    }
}

/// Structured success/failure result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub success: bool,
    pub message: &'static str,
}

impl Status {
    /// Successful result
    pub const fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }

    /// Failed result
    pub const fn failed(message: &'static str) -> Self {
        Self {
            success: false,
            message,
        }
    }
}

/// Reasons a command is refused without effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RejectReason {
    /// Homing owns the carriage
    HomingInProgress,
    /// Target coordinates are not finite
    NonFiniteTarget,
}

/// Immediate answer to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    /// Applied
    Ack,
    /// Applied; the command has no response
    Silent,
    /// Accepted; the result follows as a tick event
    Pending,
    /// Applied or refused with a message
    Status(Status),
    /// Refused, nothing changed
    Rejected(RejectReason),
}

/// Message for a successful homing run
pub const HOMED_MESSAGE: &str = "Successfully homed.";

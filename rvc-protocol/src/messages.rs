//! Message types for the carriage link
//!
//! Message types are divided into two categories:
//! - Host → Sim: one type per command, named after the ROS topics and
//!   services
//! - Sim → Host: command responses and the two joint-state streams
//!
//! Every host request carries a `seq` the simulator echoes in its response,
//! so deferred results (`tap`, `home`) can be matched to their caller.

use serde::{Deserialize, Serialize};

use crate::frame::{Frame, FrameError};
use crate::telemetry::TelemetryRecord;

// Message type IDs: Host → Sim
pub const MSG_MOVE_JR: u8 = 0x01;
pub const MSG_MOVE_JP: u8 = 0x02;
pub const MSG_VELOCITY_SCALE: u8 = 0x03;
pub const MSG_HALT: u8 = 0x04;
pub const MSG_TAP: u8 = 0x05;
pub const MSG_HOME: u8 = 0x06;
pub const MSG_SET_ENDEFF: u8 = 0x07;
pub const MSG_SET_LED: u8 = 0x08;
pub const MSG_SET_MOTORS: u8 = 0x09;

// Message type IDs: Sim → Host
pub const MSG_ACK: u8 = 0x20;
pub const MSG_STATUS: u8 = 0x21;
pub const MSG_REJECTED: u8 = 0x22;
pub const MSG_SETPOINT_JS: u8 = 0x30;
pub const MSG_GOAL_JS: u8 = 0x31;

/// Request sequence number
pub type Seq = u16;

/// Why a request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RejectCode {
    /// Homing owns the carriage
    Busy,
    /// Arguments out of domain
    Invalid,
}

/// Commands parsed from host frames
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand {
    /// Relative joint move
    MoveJr { dx: f64, dy: f64 },
    /// Absolute joint move
    MoveJp { x: f64, y: f64 },
    /// Velocity scale
    VelocityScale(f64),
    Halt,
    Tap,
    Home,
    SetEndEff(bool),
    SetLed(bool),
    SetMotors(bool),
}

/// A host command with its sequence number
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HostRequest {
    pub seq: Seq,
    pub command: HostCommand,
}

impl HostRequest {
    pub fn new(seq: Seq, command: HostCommand) -> Self {
        Self { seq, command }
    }

    /// Parse a request from a frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let request = match frame.msg_type {
            MSG_MOVE_JR => {
                let (seq, dx, dy): (Seq, f64, f64) = frame.body()?;
                Self::new(seq, HostCommand::MoveJr { dx, dy })
            }
            MSG_MOVE_JP => {
                let (seq, x, y): (Seq, f64, f64) = frame.body()?;
                Self::new(seq, HostCommand::MoveJp { x, y })
            }
            MSG_VELOCITY_SCALE => {
                let (seq, scale): (Seq, f64) = frame.body()?;
                Self::new(seq, HostCommand::VelocityScale(scale))
            }
            MSG_HALT => Self::new(frame.body()?, HostCommand::Halt),
            MSG_TAP => Self::new(frame.body()?, HostCommand::Tap),
            MSG_HOME => Self::new(frame.body()?, HostCommand::Home),
            MSG_SET_ENDEFF => {
                let (seq, down): (Seq, bool) = frame.body()?;
                Self::new(seq, HostCommand::SetEndEff(down))
            }
            MSG_SET_LED => {
                let (seq, on): (Seq, bool) = frame.body()?;
                Self::new(seq, HostCommand::SetLed(on))
            }
            MSG_SET_MOTORS => {
                let (seq, on): (Seq, bool) = frame.body()?;
                Self::new(seq, HostCommand::SetMotors(on))
            }
            other => return Err(FrameError::UnknownType(other)),
        };
        Ok(request)
    }

    /// Encode this request into a frame (for clients and tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let seq = self.seq;
        match self.command {
            HostCommand::MoveJr { dx, dy } => Frame::with_body(MSG_MOVE_JR, &(seq, dx, dy)),
            HostCommand::MoveJp { x, y } => Frame::with_body(MSG_MOVE_JP, &(seq, x, y)),
            HostCommand::VelocityScale(s) => Frame::with_body(MSG_VELOCITY_SCALE, &(seq, s)),
            HostCommand::Halt => Frame::with_body(MSG_HALT, &seq),
            HostCommand::Tap => Frame::with_body(MSG_TAP, &seq),
            HostCommand::Home => Frame::with_body(MSG_HOME, &seq),
            HostCommand::SetEndEff(down) => Frame::with_body(MSG_SET_ENDEFF, &(seq, down)),
            HostCommand::SetLed(on) => Frame::with_body(MSG_SET_LED, &(seq, on)),
            HostCommand::SetMotors(on) => Frame::with_body(MSG_SET_MOTORS, &(seq, on)),
        }
    }
}

/// Messages from the simulator to the host
#[derive(Debug, Clone, PartialEq)]
pub enum SimMessage<'a> {
    /// Request applied
    Ack { seq: Seq },
    /// Structured `{success, message}` result
    Status {
        seq: Seq,
        success: bool,
        message: &'a str,
    },
    /// Request refused, nothing changed
    Rejected { seq: Seq, code: RejectCode },
    /// Periodic joint state
    SetpointJs(TelemetryRecord<'a>),
    /// Goal-reached joint state
    GoalJs(TelemetryRecord<'a>),
}

impl<'a> SimMessage<'a> {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            SimMessage::Ack { seq } => Frame::with_body(MSG_ACK, seq),
            SimMessage::Status {
                seq,
                success,
                message,
            } => Frame::with_body(MSG_STATUS, &(seq, success, message)),
            SimMessage::Rejected { seq, code } => Frame::with_body(MSG_REJECTED, &(seq, code)),
            SimMessage::SetpointJs(record) => Frame::with_body(MSG_SETPOINT_JS, record),
            SimMessage::GoalJs(record) => Frame::with_body(MSG_GOAL_JS, record),
        }
    }

    /// Parse a message from a frame (for clients and tests)
    pub fn from_frame(frame: &'a Frame) -> Result<Self, FrameError> {
        let message = match frame.msg_type {
            MSG_ACK => SimMessage::Ack { seq: frame.body()? },
            MSG_STATUS => {
                let (seq, success, message): (Seq, bool, &str) = frame.body()?;
                SimMessage::Status {
                    seq,
                    success,
                    message,
                }
            }
            MSG_REJECTED => {
                let (seq, code): (Seq, RejectCode) = frame.body()?;
                SimMessage::Rejected { seq, code }
            }
            MSG_SETPOINT_JS => SimMessage::SetpointJs(frame.body()?),
            MSG_GOAL_JS => SimMessage::GoalJs(frame.body()?),
            other => return Err(FrameError::UnknownType(other)),
        };
        Ok(message)
    }

    /// Sequence number of the request this message answers
    pub fn seq(&self) -> Option<Seq> {
        match self {
            SimMessage::Ack { seq }
            | SimMessage::Status { seq, .. }
            | SimMessage::Rejected { seq, .. } => Some(*seq),
            SimMessage::SetpointJs(_) | SimMessage::GoalJs(_) => None,
        }
    }
}

//! Carriage Link Protocol
//!
//! This crate defines the byte-stream protocol between the carriage
//! simulator and its host. Requests flow in one type per command; responses
//! and joint-state telemetry flow out.
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! Payloads are postcard-encoded. The simulator holds all state; the host
//! only sends requests and consumes what comes back.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;
pub mod telemetry;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{HostCommand, HostRequest, RejectCode, Seq, SimMessage};
pub use telemetry::{SeqCounter, TelemetryRecord, JOINT_NAMES};

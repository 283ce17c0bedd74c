//! Inter-task communication channels
//!
//! Defines the static channels between the link and the controller.
//! Uses embassy-sync primitives; the stdin reader thread feeds
//! `REQUEST_CHANNEL` from outside the executor.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use rvc_protocol::{Frame, HostRequest};

/// Channel capacity for inbound requests
pub const REQUEST_CHANNEL_SIZE: usize = 32;

/// Channel capacity for outbound frames
pub const OUTBOUND_CHANNEL_SIZE: usize = 64;

/// Parsed requests from the host
pub static REQUEST_CHANNEL: Channel<CriticalSectionRawMutex, HostRequest, REQUEST_CHANNEL_SIZE> =
    Channel::new();

/// Responses and telemetry waiting to be written to the host
pub static OUTBOUND_CHANNEL: Channel<CriticalSectionRawMutex, Frame, OUTBOUND_CHANNEL_SIZE> =
    Channel::new();

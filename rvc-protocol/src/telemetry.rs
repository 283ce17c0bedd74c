//! Joint state record
//!
//! Shared by the periodic `setpoint_js` stream and the `goal_js` event.

use serde::{Deserialize, Serialize};

/// Axis names in record order
pub const JOINT_NAMES: [&str; 2] = ["x", "y"];

/// Joint state record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord<'a> {
    /// Per-stream monotonic sequence number
    pub seq: u32,
    /// Milliseconds since simulator start
    pub stamp_ms: u64,
    /// Reference frame name
    pub frame_id: &'a str,
    /// Axis names
    #[serde(borrow)]
    pub name: [&'a str; 2],
    /// Carriage position
    pub position: [f64; 2],
    /// Collision offset
    pub effort: [f64; 2],
}

/// Per-stream sequence counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeqCounter {
    next: u32,
}

impl SeqCounter {
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Take the next sequence number
    pub fn next_seq(&mut self) -> u32 {
        let seq = self.next;
        self.next = self.next.wrapping_add(1);
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fits_one_frame() {
        let record = TelemetryRecord {
            seq: u32::MAX,
            stamp_ms: u64::MAX,
            frame_id: "a_rather_long_frame_identifier",
            name: JOINT_NAMES,
            position: [f64::MAX, f64::MIN],
            effort: [f64::MAX, f64::MIN],
        };
        let mut buffer = [0u8; crate::frame::MAX_PAYLOAD_SIZE];
        assert!(postcard::to_slice(&record, &mut buffer).is_ok());
    }

    #[test]
    fn test_seq_counter_is_monotonic() {
        let mut counter = SeqCounter::new();
        assert_eq!(counter.next_seq(), 0);
        assert_eq!(counter.next_seq(), 1);
        assert_eq!(counter.next_seq(), 2);
    }
}

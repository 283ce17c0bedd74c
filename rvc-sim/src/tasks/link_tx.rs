//! Link transmit task
//!
//! Writes queued response and telemetry frames to stdout.

use std::io::{self, Write};

use tracing::{info, trace, warn};

use rvc_protocol::{Frame, MAX_FRAME_SIZE};

use crate::channels::OUTBOUND_CHANNEL;

/// Link TX task - drains the outbound channel onto the link
#[embassy_executor::task]
pub async fn link_tx_task() {
    info!("Link TX task started");

    let stdout = io::stdout();
    loop {
        let frame = OUTBOUND_CHANNEL.receive().await;
        if let Err(e) = send_frame(&mut stdout.lock(), &frame) {
            warn!("Failed to send frame 0x{:02X}: {}", frame.msg_type, e);
        } else {
            trace!("TX: frame 0x{:02X}", frame.msg_type);
        }
    }
}

/// Encode and write one frame
fn send_frame<W: Write>(out: &mut W, frame: &Frame) -> io::Result<()> {
    let mut buf = [0u8; MAX_FRAME_SIZE];
    let len = frame
        .encode(&mut buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", e)))?;
    out.write_all(&buf[..len])?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvc_protocol::{FrameParser, SimMessage};

    #[test]
    fn test_send_frame_writes_whole_frame() {
        let frame = SimMessage::Ack { seq: 7 }.to_frame().unwrap();
        let mut sink = std::vec::Vec::new();
        send_frame(&mut sink, &frame).unwrap();
        assert_eq!(sink.len(), frame.encoded_len());

        let mut parser = FrameParser::new();
        let mut parsed = std::vec::Vec::new();
        parser.feed_all(&sink, |r| parsed.push(r.unwrap()));
        assert_eq!(parsed, [frame]);
    }
}

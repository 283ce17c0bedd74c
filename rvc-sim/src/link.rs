//! Simulated device link
//!
//! The simulator stands in for a carriage on a serial port. Opening the
//! link only checks the configured device path; the bytes themselves flow
//! over stdin (requests) and stdout (responses and telemetry).

use std::io::{self, Read};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use embassy_sync::channel::TrySendError;
use tracing::{debug, info, trace, warn};

use rvc_protocol::{Frame, FrameError, FrameParser, HostRequest};

use crate::channels::REQUEST_CHANNEL;
use crate::error::{SimError, SimResult};

/// Buffer size for link reads
const RX_BUF_SIZE: usize = 256;

/// Back-off while the request channel is full
const REQUEST_RETRY: Duration = Duration::from_millis(1);

/// An opened simulated link
#[derive(Debug)]
pub struct SimulatedLink {
    port: String,
}

impl SimulatedLink {
    /// Open the link on `port`
    pub fn open(port: &str) -> SimResult<Self> {
        if port.trim().is_empty() {
            return Err(SimError::Link {
                port: port.into(),
                reason: "no device path",
            });
        }
        info!("Opened serial port {}", port);
        Ok(Self { port: port.into() })
    }

    /// Device path this link was opened on
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Start the receive thread reading host frames from stdin
    ///
    /// Blocking reads stay off the executor thread; parsed requests are
    /// handed over through [`REQUEST_CHANNEL`].
    pub fn spawn_receiver(&self) -> SimResult<JoinHandle<()>> {
        let handle = thread::Builder::new()
            .name("link-rx".into())
            .spawn(|| receive_loop(io::stdin().lock(), enqueue))?;
        Ok(handle)
    }
}

/// Read frames from `input` until it closes, passing each request on
fn receive_loop<R: Read>(mut input: R, mut deliver: impl FnMut(HostRequest)) {
    info!("Link RX started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match input.read(&mut buf) {
            Ok(0) => {
                info!("Host closed the link");
                return;
            }
            Ok(n) => {
                trace!("RX: {} bytes", n);
                parser.feed_all(&buf[..n], |result| {
                    if let Some(request) = parse_request(result) {
                        deliver(request);
                    }
                });
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => {
                warn!("Link read error: {}", e);
                return;
            }
        }
    }
}

fn parse_request(result: Result<Frame, FrameError>) -> Option<HostRequest> {
    let frame = match result {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Frame parse error: {:?}", e);
            return None;
        }
    };
    match HostRequest::from_frame(&frame) {
        Ok(request) => Some(request),
        Err(e) => {
            warn!("Failed to parse host request: {:?}", e);
            None
        }
    }
}

/// Hand a request to the controller, waiting while the channel is full
fn enqueue(mut request: HostRequest) {
    loop {
        match REQUEST_CHANNEL.try_send(request) {
            Ok(()) => return,
            Err(TrySendError::Full(back)) => {
                debug!("Request channel full, retrying");
                request = back;
                thread::sleep(REQUEST_RETRY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvc_protocol::HostCommand;

    #[test]
    fn test_open_reports_port() {
        let link = SimulatedLink::open("/dev/ttyUSB0").unwrap();
        assert_eq!(link.port(), "/dev/ttyUSB0");
    }

    #[test]
    fn test_open_rejects_blank_port() {
        assert!(matches!(
            SimulatedLink::open(" "),
            Err(SimError::Link { .. })
        ));
    }

    #[test]
    fn test_receive_loop_skips_bad_frames() {
        let mut bytes = std::vec::Vec::new();
        let home = HostRequest::new(1, HostCommand::Home).to_frame().unwrap();
        bytes.extend_from_slice(&home.encode_to_vec().unwrap());

        // Corrupt checksum
        let mut bad = HostRequest::new(2, HostCommand::Tap)
            .to_frame()
            .unwrap()
            .encode_to_vec()
            .unwrap();
        let last = bad.len() - 1;
        bad[last] ^= 0x5A;
        bytes.extend_from_slice(&bad);

        // Unknown type
        bytes.extend_from_slice(&Frame::empty(0x7E).encode_to_vec().unwrap());

        let led = HostRequest::new(3, HostCommand::SetLed(true)).to_frame().unwrap();
        bytes.extend_from_slice(&led.encode_to_vec().unwrap());

        let mut seen = std::vec::Vec::new();
        receive_loop(bytes.as_slice(), |request| seen.push(request));
        assert_eq!(
            seen,
            [
                HostRequest::new(1, HostCommand::Home),
                HostRequest::new(3, HostCommand::SetLed(true)),
            ]
        );
    }
}

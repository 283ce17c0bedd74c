//! Frame codec for the carriage link.
//!
//! Frame format:
//! - START (1 byte): 0xAA synchronization byte
//! - LENGTH (1 byte): payload length (0-250)
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-250 bytes): postcard-encoded body
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE, and all PAYLOAD bytes

use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xAA;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 250;

/// Bytes a frame adds around its payload
pub const FRAME_OVERHEAD: usize = 4;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = FRAME_OVERHEAD + MAX_PAYLOAD_SIZE;

/// Errors from frame parsing, encoding or payload decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Checksum mismatch
    InvalidChecksum,
    /// Invalid frame structure
    InvalidFrame,
    /// Buffer too small for encoding
    BufferTooSmall,
    /// Unknown message type
    UnknownType(u8),
    /// Payload does not decode as the type's body
    InvalidPayload,
}

/// A parsed or constructed frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a frame from raw payload bytes
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let payload = Vec::from_slice(payload).map_err(|_| FrameError::PayloadTooLarge)?;
        Ok(Self { msg_type, payload })
    }

    /// Create a frame with no payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    /// Create a frame whose payload is `body` encoded with postcard
    pub fn with_body<T: Serialize>(msg_type: u8, body: &T) -> Result<Self, FrameError> {
        let mut buffer = [0u8; MAX_PAYLOAD_SIZE];
        let used = postcard::to_slice(body, &mut buffer).map_err(|_| FrameError::PayloadTooLarge)?;
        Self::new(msg_type, used)
    }

    /// Decode the payload as `T`
    ///
    /// Borrowed fields in `T` point into this frame.
    pub fn body<'de, T: Deserialize<'de>>(&'de self) -> Result<T, FrameError> {
        postcard::from_bytes(&self.payload).map_err(|_| FrameError::InvalidPayload)
    }

    fn checksum(length: u8, msg_type: u8, payload: &[u8]) -> u8 {
        payload.iter().fold(length ^ msg_type, |acc, &b| acc ^ b)
    }

    /// Total encoded size of this frame
    pub fn encoded_len(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let length = self.payload.len() as u8;
        let end = 3 + self.payload.len();

        buffer[0] = FRAME_START;
        buffer[1] = length;
        buffer[2] = self.msg_type;
        buffer[3..end].copy_from_slice(&self.payload);
        buffer[end] = Self::checksum(length, self.msg_type, &self.payload);

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_SIZE>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }
}

/// Incremental frame decoder
///
/// Bytes arrive in arbitrary chunks; the parser keeps its position across
/// calls and resynchronizes on the next START byte after an error.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
    expected_length: u8,
    msg_type: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    WaitingForStart,
    WaitingForLength,
    WaitingForType,
    ReadingPayload,
    WaitingForChecksum,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForStart,
            buffer: Vec::new(),
            expected_length: 0,
            msg_type: 0,
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForStart;
        self.buffer.clear();
        self.expected_length = 0;
        self.msg_type = 0;
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(frame))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` on parse error.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Frame>, FrameError> {
        match self.state {
            ParseState::WaitingForStart => {
                // Anything before START is line noise
                if byte == FRAME_START {
                    self.state = ParseState::WaitingForLength;
                }
                Ok(None)
            }
            ParseState::WaitingForLength => {
                if usize::from(byte) > MAX_PAYLOAD_SIZE {
                    self.reset();
                    return Err(FrameError::InvalidFrame);
                }
                self.expected_length = byte;
                self.state = ParseState::WaitingForType;
                Ok(None)
            }
            ParseState::WaitingForType => {
                self.msg_type = byte;
                self.buffer.clear();
                self.state = if self.expected_length == 0 {
                    ParseState::WaitingForChecksum
                } else {
                    ParseState::ReadingPayload
                };
                Ok(None)
            }
            ParseState::ReadingPayload => {
                // Capacity is MAX_PAYLOAD_SIZE and LENGTH was bounded above
                let _ = self.buffer.push(byte);
                if self.buffer.len() == usize::from(self.expected_length) {
                    self.state = ParseState::WaitingForChecksum;
                }
                Ok(None)
            }
            ParseState::WaitingForChecksum => {
                let expected = Frame::checksum(self.expected_length, self.msg_type, &self.buffer);
                if byte != expected {
                    self.reset();
                    return Err(FrameError::InvalidChecksum);
                }

                let frame = Frame {
                    msg_type: self.msg_type,
                    payload: core::mem::take(&mut self.buffer),
                };
                self.reset();
                Ok(Some(frame))
            }
        }
    }

    /// Feed a chunk of bytes, handing every parse result to `on_result`
    ///
    /// Unlike stopping at the first frame, no bytes are dropped: a chunk
    /// holding several frames yields each of them.
    pub fn feed_all(&mut self, bytes: &[u8], mut on_result: impl FnMut(Result<Frame, FrameError>)) {
        for &byte in bytes {
            match self.feed(byte) {
                Ok(Some(frame)) => on_result(Ok(frame)),
                Ok(None) => {}
                Err(e) => on_result(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse_all(bytes: &[u8]) -> std::vec::Vec<Result<Frame, FrameError>> {
        let mut parser = FrameParser::new();
        let mut out = std::vec::Vec::new();
        parser.feed_all(bytes, |r| out.push(r));
        out
    }

    #[test]
    fn test_frame_encode_empty_payload() {
        let frame = Frame::empty(0x04);
        let mut buffer = [0u8; 10];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 4);
        assert_eq!(&buffer[..4], &[FRAME_START, 0, 0x04, 0x04]);
    }

    #[test]
    fn test_frame_encode_with_payload() {
        let frame = Frame::new(0x21, &[0x01, 0x02, 0x04]).unwrap();
        let mut buffer = [0u8; 20];
        let len = frame.encode(&mut buffer).unwrap();

        assert_eq!(len, 7);
        assert_eq!(buffer[1], 3);
        assert_eq!(buffer[2], 0x21);
        assert_eq!(&buffer[3..6], &[0x01, 0x02, 0x04]);
        // 3 ^ 0x21 ^ 1 ^ 2 ^ 4
        assert_eq!(buffer[6], 0x25);
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = Frame::new(0x01, &[1, 2, 3]).unwrap();
        let mut buffer = [0u8; 6];
        assert_eq!(frame.encode(&mut buffer), Err(FrameError::BufferTooSmall));
    }

    #[test]
    fn test_payload_too_large() {
        let large_payload = [0u8; MAX_PAYLOAD_SIZE + 1];
        assert_eq!(
            Frame::new(0x21, &large_payload),
            Err(FrameError::PayloadTooLarge)
        );
    }

    #[test]
    fn test_body_decodes_postcard() {
        let frame = Frame::with_body(0x01, &(7u16, 1.5f64, -2.0f64)).unwrap();
        let (seq, x, y): (u16, f64, f64) = frame.body().unwrap();
        assert_eq!((seq, x, y), (7, 1.5, -2.0));
    }

    #[test]
    fn test_body_rejects_short_payload() {
        let frame = Frame::new(0x01, &[0x01]).unwrap();
        assert_eq!(
            frame.body::<(u16, f64, f64)>(),
            Err(FrameError::InvalidPayload)
        );
    }

    #[test]
    fn test_parser_invalid_checksum() {
        let mut encoded = Frame::empty(0x04).encode_to_vec().unwrap();
        let last = encoded.len() - 1;
        encoded[last] ^= 0xFF;

        let results = parse_all(&encoded);
        assert_eq!(results, [Err(FrameError::InvalidChecksum)]);
    }

    #[test]
    fn test_parser_rejects_oversized_length() {
        let results = parse_all(&[FRAME_START, 251]);
        assert_eq!(results, [Err(FrameError::InvalidFrame)]);
    }

    #[test]
    fn test_parser_resync_after_garbage() {
        let encoded = Frame::empty(0x06).encode_to_vec().unwrap();
        let mut data = std::vec![0x00, 0xFF, 0x12, 0x34];
        data.extend_from_slice(&encoded);

        let results = parse_all(&data);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap().msg_type, 0x06);
    }

    #[test]
    fn test_feed_all_yields_every_frame_in_chunk() {
        let mut data = std::vec::Vec::new();
        data.extend_from_slice(&Frame::empty(0x04).encode_to_vec().unwrap());
        data.extend_from_slice(&Frame::new(0x08, &[0x00, 0x01]).unwrap().encode_to_vec().unwrap());

        let types: std::vec::Vec<u8> = parse_all(&data)
            .into_iter()
            .map(|r| r.unwrap().msg_type)
            .collect();
        assert_eq!(types, [0x04, 0x08]);
    }

    #[test]
    fn test_split_chunks_reassemble() {
        let encoded = Frame::new(0x02, &[9, 8, 7, 6]).unwrap().encode_to_vec().unwrap();
        let mut parser = FrameParser::new();
        let mut frames = std::vec::Vec::new();
        for chunk in encoded.chunks(3) {
            parser.feed_all(chunk, |r| frames.push(r.unwrap()));
        }
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].payload.as_slice(), &[9, 8, 7, 6]);
    }

    proptest! {
        #[test]
        fn prop_parser_never_panics_and_recovers(
            noise in proptest::collection::vec(any::<u8>(), 0..64),
            payload in proptest::collection::vec(any::<u8>(), 0..32),
        ) {
            let frame = Frame::new(0x03, &payload).unwrap();
            let mut parser = FrameParser::new();
            parser.feed_all(&noise, |_| {});
            parser.reset();

            let mut frames = std::vec::Vec::new();
            parser.feed_all(&frame.encode_to_vec().unwrap(), |r| {
                if let Ok(f) = r {
                    frames.push(f);
                }
            });
            prop_assert_eq!(frames, std::vec![frame]);
        }
    }
}

//! Length-prefixed framing.
//!
//! Every message on the wire is `[u16 totalLength][u16 opcode][payload]`,
//! little-endian, where `totalLength` counts the four header bytes too.
//! [`FrameReader`] turns an arbitrary sequence of byte chunks back into
//! whole frames, however the stream was split in transit.

use crate::{Opcode, PacketReader, ProtocolError};

/// Size of the `totalLength` + `opcode` header.
pub const HEADER_LEN: usize = 4;

/// Largest frame a `u16` length can describe, header included.
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// One complete protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Raw opcode. Kept as a number so unknown opcodes survive intact.
    pub opcode: u16,
    /// Payload bytes, header excluded.
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(opcode: u16, payload: Vec<u8>) -> Self {
        Self { opcode, payload }
    }

    /// The opcode as a known [`Opcode`], if it is one.
    pub fn known_opcode(&self) -> Option<Opcode> {
        Opcode::from_u16(self.opcode)
    }

    /// A reader positioned at the start of the payload.
    pub fn reader(&self) -> PacketReader<'_> {
        PacketReader::new(&self.payload)
    }

    /// Serializes the frame including its header.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
        encode_frame(self.opcode, &self.payload)
    }
}

/// Builds `[totalLength][opcode][payload]` with `totalLength = 4 + len`.
///
/// # Errors
/// [`ProtocolError::PayloadTooLarge`] if the frame would exceed 65535 bytes.
pub fn encode_frame(opcode: u16, payload: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let total = HEADER_LEN + payload.len();
    if total > MAX_FRAME_LEN {
        return Err(ProtocolError::PayloadTooLarge { len: payload.len() });
    }
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&(total as u16).to_le_bytes());
    out.extend_from_slice(&opcode.to_le_bytes());
    out.extend_from_slice(payload);
    Ok(out)
}

// ---------------------------------------------------------------------------
// FrameReader
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    /// Fewer than four bytes buffered; the frame length is not known yet.
    AwaitingHeader,
    /// Header parsed; waiting until `total` bytes are buffered.
    AwaitingBody { total: usize, opcode: u16 },
    /// A header declared a length below [`HEADER_LEN`]. Terminal.
    Broken { declared: u16 },
}

/// Reassembles frames from a byte stream.
///
/// Bytes go in with [`push`](Self::push) or [`feed`](Self::feed); complete
/// frames come out in arrival order. Partial data stays buffered until the
/// rest of it arrives. A header that declares a length below four bytes
/// breaks the reader permanently, since nothing after it can be framed.
///
/// ```rust
/// use mystwire_protocol::{encode_frame, FrameReader};
///
/// let bytes = encode_frame(102, &[0, 0]).unwrap();
/// let mut reader = FrameReader::new();
/// assert!(reader.feed(&bytes[..3]).unwrap().is_empty());
/// let frames = reader.feed(&bytes[3..]).unwrap();
/// assert_eq!(frames.len(), 1);
/// assert_eq!(frames[0].opcode, 102);
/// ```
#[derive(Debug, Clone)]
pub struct FrameReader {
    buf: Vec<u8>,
    /// Offset of the first unconsumed byte in `buf`.
    start: usize,
    state: ReadState,
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReader {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            start: 0,
            state: ReadState::AwaitingHeader,
        }
    }

    /// Appends bytes without extracting anything.
    pub fn push(&mut self, bytes: &[u8]) {
        if self.start > 0 {
            self.buf.drain(..self.start);
            self.start = 0;
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Extracts the next complete frame, if one is buffered.
    ///
    /// # Errors
    /// [`ProtocolError::Framing`] once a too-short length has been seen.
    /// The error repeats on every later call.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, ProtocolError> {
        loop {
            let available = &self.buf[self.start..];
            match self.state {
                ReadState::Broken { declared } => {
                    return Err(ProtocolError::Framing { declared });
                }
                ReadState::AwaitingHeader => {
                    if available.len() < HEADER_LEN {
                        return Ok(None);
                    }
                    let declared = u16::from_le_bytes([available[0], available[1]]);
                    let opcode = u16::from_le_bytes([available[2], available[3]]);
                    if usize::from(declared) < HEADER_LEN {
                        self.state = ReadState::Broken { declared };
                        continue;
                    }
                    self.state = ReadState::AwaitingBody {
                        total: usize::from(declared),
                        opcode,
                    };
                }
                ReadState::AwaitingBody { total, opcode } => {
                    if available.len() < total {
                        return Ok(None);
                    }
                    let payload = available[HEADER_LEN..total].to_vec();
                    self.start += total;
                    self.state = ReadState::AwaitingHeader;
                    return Ok(Some(Frame { opcode, payload }));
                }
            }
        }
    }

    /// Appends `bytes` and returns every frame now complete, in order.
    ///
    /// Frames that precede a framing violation in the same call are lost
    /// with the error; use [`push`](Self::push) with
    /// [`next_frame`](Self::next_frame) to keep them.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<Frame>, ProtocolError> {
        self.push(bytes);
        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Bytes buffered but not yet returned as part of a frame.
    pub fn buffered(&self) -> usize {
        self.buf.len() - self.start
    }

    /// Returns `true` while waiting for the next frame's header.
    pub fn is_awaiting_header(&self) -> bool {
        matches!(self.state, ReadState::AwaitingHeader)
    }

    /// Returns `true` once a framing violation has been seen.
    pub fn is_broken(&self) -> bool {
        matches!(self.state, ReadState::Broken { .. })
    }
}

//! Error types for the protocol layer.
//!
//! Decoding a payload never fails: short reads fall back to zero values
//! (see [`PacketReader`](crate::PacketReader)). The errors here are about
//! the *frame* around a payload, which cannot be recovered once broken.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// A frame header declared a total length smaller than the header
    /// itself. Every byte after this point is unframeable.
    #[error("declared frame length {declared} is below the 4-byte header")]
    Framing {
        /// The length field as read from the wire.
        declared: u16,
    },

    /// A payload is too large for the u16 length prefix.
    #[error("payload of {len} bytes does not fit in a frame")]
    PayloadTooLarge {
        /// Payload size in bytes.
        len: usize,
    },

    /// A raw opcode does not name any known message.
    #[error("unknown opcode {0}")]
    UnknownOpcode(u16),
}

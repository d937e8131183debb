//! Wire protocol for mystwire.
//!
//! This crate defines the bytes that a client and a game server exchange:
//!
//! - **Codec** ([`PacketWriter`], [`PacketReader`], [`Wire`]): fixed-width
//!   little-endian scalars, length-prefixed strings, counted lists and
//!   integer maps. Reads never fail; short payloads decode as zeros.
//! - **Framing** ([`FrameReader`], [`encode_frame`]): the
//!   `[u16 totalLength][u16 opcode][payload]` envelope.
//! - **Opcodes** ([`Opcode`]): the flat message-type table.
//! - **Packets** ([`Packet`], [`server`], [`client`]): one struct per
//!   message, with its layout declared once.
//!
//! # Architecture
//!
//! The protocol layer knows nothing about sockets or session state. It
//! is pure data in, data out.
//!
//! ```text
//! Transport (bytes) → Protocol (Frame, Packet) → Session (state, versions)
//! ```

#[macro_use]
mod macros;

mod codec;
mod error;
mod frame;
mod opcode;
mod types;

pub mod client;
pub mod server;

pub use codec::{PacketReader, PacketWriter, Wire};
pub use error::ProtocolError;
pub use frame::{encode_frame, Frame, FrameReader, HEADER_LEN, MAX_FRAME_LEN};
pub use opcode::{Opcode, MAX_OPCODE};
pub use types::{
    AuthResult, CharCreateResult, ChatChannel, ItemId, Packet, PartyChange, Ping,
};

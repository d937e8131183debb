//! Shared field types and the [`Packet`] trait.

use crate::{encode_frame, Opcode, PacketReader, PacketWriter, ProtocolError};

/// A message with a fixed opcode and payload layout.
///
/// `read` follows the codec's lenient rules and cannot fail: a short payload
/// decodes into a value whose trailing fields are zero.
///
/// ```rust
/// use mystwire_protocol::{client, Packet};
///
/// let create = client::CharCreate {
///     name: "Testchar".into(),
///     class_id: 1,
///     gender: 0,
///     portrait: 0,
/// };
/// let decoded = client::CharCreate::decode(&create.encode());
/// assert_eq!(decoded, create);
/// ```
pub trait Packet: Sized {
    /// Opcode this message travels under.
    const OPCODE: Opcode;

    /// Appends the payload fields.
    fn write(&self, w: &mut PacketWriter);

    /// Reads the payload fields.
    fn read(r: &mut PacketReader<'_>) -> Self;

    /// Payload bytes, without the frame header.
    fn encode(&self) -> Vec<u8> {
        let mut w = PacketWriter::new();
        self.write(&mut w);
        w.into_bytes()
    }

    /// Decodes a payload from the start.
    fn decode(payload: &[u8]) -> Self {
        Self::read(&mut PacketReader::new(payload))
    }

    /// Full frame: header plus payload.
    fn to_frame(&self) -> Result<Vec<u8>, ProtocolError> {
        encode_frame(Self::OPCODE.as_u16(), &self.encode())
    }
}

packet! {
    /// Keepalive. Either side may send it; the other echoes it back.
    Ping = Ping {}
}

wire_record! {
    /// Item identity: base item plus affixes and socketed gems.
    ItemId {
        item_id: i32,
        affix1: i32,
        affix2: i32,
        gem1: i32,
        gem2: i32,
        gem3: i32,
    }
}

impl ItemId {
    /// A plain item with no affixes or gems.
    pub fn new(item_id: i32) -> Self {
        Self {
            item_id,
            ..Self::default()
        }
    }

    /// Returns `true` for the all-zero "no item" value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

code_enum! {
    /// Outcome of an authentication attempt.
    AuthResult {
        Validated = 0,
        WrongVersion = 1,
        BadPassword = 2,
        ServerFull = 3,
        Banned = 4,
    }
}

code_enum! {
    /// Outcome of a character creation request.
    CharCreateResult {
        Success = 0,
        AlreadyExists = 1,
        InvalidChars = 2,
        Reserved = 3,
        TooShort = 4,
        TooLong = 5,
    }
}

code_enum! {
    /// Chat channel a message was sent on.
    ChatChannel {
        Say = 0,
        Yell = 1,
        Whisper = 2,
        Party = 3,
        Guild = 4,
        AllChat = 5,
        System = 6,
        SystemCenter = 7,
        ExpPurple = 8,
        RedWarning = 9,
    }
}

code_enum! {
    /// Party membership change requested by a client.
    PartyChange {
        Leave = 0,
        Kick = 1,
        Promote = 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Wire;

    #[test]
    fn test_item_id_is_24_bytes() {
        let mut w = PacketWriter::new();
        ItemId::new(5).write_to(&mut w);
        assert_eq!(w.len(), 24);
        assert_eq!(&w.as_bytes()[..4], &5i32.to_le_bytes());
    }

    #[test]
    fn test_item_id_empty() {
        assert!(ItemId::default().is_empty());
        assert!(!ItemId::new(1).is_empty());
    }

    #[test]
    fn test_unknown_code_survives() {
        assert_eq!(AuthResult::from_code(42), AuthResult::Other(42));
        assert_eq!(AuthResult::Other(42).code(), 42);
        assert_eq!(AuthResult::default(), AuthResult::Validated);
    }

    #[test]
    fn test_ping_has_empty_payload() {
        assert!(Ping {}.encode().is_empty());
        assert_eq!(Ping {}.to_frame().unwrap(), vec![4, 0, 0, 0]);
    }
}

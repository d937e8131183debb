//! Unified error type for mystwire.

use mystwire_protocol::ProtocolError;
use mystwire_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes let `?` convert sub-crate errors directly.
#[derive(Debug, thiserror::Error)]
pub enum MystwireError {
    /// Connect, read or write failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A frame could not be built or the stream broke framing.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The connection is closed; nothing more can be sent on it.
    #[error("connection closed")]
    Closed,

    /// The configuration could not be parsed.
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read config: {0}")]
    ConfigIo(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let mystwire_err: MystwireError = err.into();
        assert!(matches!(mystwire_err, MystwireError::Transport(_)));
        assert!(mystwire_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::Framing { declared: 2 };
        let mystwire_err: MystwireError = err.into();
        assert!(matches!(mystwire_err, MystwireError::Protocol(_)));
    }

    #[test]
    fn test_closed_display() {
        assert_eq!(MystwireError::Closed.to_string(), "connection closed");
    }
}

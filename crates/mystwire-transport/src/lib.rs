//! Transport layer for mystwire.
//!
//! Provides the [`Link`] trait, a byte pipe to one server, and its TCP
//! implementation [`TcpLink`]. A link knows nothing about frames: it moves
//! chunks of bytes in and out and reports end-of-stream.

#![allow(async_fn_in_trait)]

mod error;
mod tcp;

pub use error::TransportError;
pub use tcp::{DEFAULT_CHUNK_SIZE, DEFAULT_WRITE_TIMEOUT, TcpLink};

use std::fmt;

/// Opaque identifier for a link, used to correlate log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link-{}", self.0)
    }
}

/// A bidirectional byte stream to a remote peer.
pub trait Link: Send + Sync + 'static {
    /// The error type for link operations.
    type Error: std::error::Error + Send + Sync;

    /// Writes all of `data`, failing if the peer does not drain it in time.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Reads whatever is available, up to the link's chunk size.
    ///
    /// Returns `Ok(None)` when the peer has closed the stream. Must be
    /// cancel-safe: dropping the future loses no bytes.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Shuts down the write side and releases the socket. Later sends fail
    /// and later reads see end-of-stream.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this link.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_new_and_into_inner() {
        let id = ConnectionId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display() {
        assert_eq!(ConnectionId::new(7).to_string(), "link-7");
    }

    #[test]
    fn test_connection_id_hash_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "alice");
        map.insert(ConnectionId::new(2), "bob");
        assert_eq!(map[&ConnectionId::new(1)], "alice");
    }
}

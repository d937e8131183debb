//! TCP implementation of [`Link`].

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

use crate::{ConnectionId, Link, TransportError};

/// Counter for generating unique link IDs.
static NEXT_LINK_ID: AtomicU64 = AtomicU64::new(1);

/// Default upper bound on a single read.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Default limit on how long one `send` may wait for the peer to drain.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// A TCP stream split into independently locked halves, so a blocked read
/// never holds up a write.
///
/// [`close`](Link::close) drops both halves, which releases the socket.
pub struct TcpLink {
    id: ConnectionId,
    peer: SocketAddr,
    reader: Mutex<Option<OwnedReadHalf>>,
    writer: Mutex<Option<OwnedWriteHalf>>,
    chunk_size: usize,
    write_timeout: Duration,
    closed: AtomicBool,
}

impl TcpLink {
    /// Connects to `addr`, giving up after `timeout`. Never retries.
    pub async fn connect(
        addr: &str,
        timeout: Duration,
        chunk_size: usize,
    ) -> Result<Self, TransportError> {
        let stream = match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(TransportError::ConnectFailed {
                    addr: addr.to_string(),
                    source,
                });
            }
            Err(_) => return Err(TransportError::ConnectTimeout(addr.to_string())),
        };
        Self::from_stream(stream, chunk_size)
    }

    /// Wraps an already connected stream.
    pub fn from_stream(stream: TcpStream, chunk_size: usize) -> Result<Self, TransportError> {
        let peer = stream.peer_addr().map_err(TransportError::ReceiveFailed)?;
        // Small request frames should not sit in Nagle's buffer.
        stream.set_nodelay(true).map_err(TransportError::SendFailed)?;
        let (reader, writer) = stream.into_split();

        let id = ConnectionId::new(NEXT_LINK_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %peer, "tcp link established");

        Ok(Self {
            id,
            peer,
            reader: Mutex::new(Some(reader)),
            writer: Mutex::new(Some(writer)),
            chunk_size: chunk_size.max(1),
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            closed: AtomicBool::new(false),
        })
    }

    /// Sets how long a single `send` may block before it fails with
    /// [`io::ErrorKind::TimedOut`].
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    fn closed_error(&self) -> TransportError {
        TransportError::ConnectionClosed(self.id.to_string())
    }

    /// Address of the remote peer.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Returns `true` once [`close`](Link::close) has run.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Link for TcpLink {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        if self.is_closed() {
            return Err(self.closed_error());
        }
        let mut guard = self.writer.lock().await;
        let Some(writer) = guard.as_mut() else {
            return Err(self.closed_error());
        };
        match tokio::time::timeout(self.write_timeout, writer.write_all(data)).await {
            Ok(result) => result.map_err(TransportError::SendFailed),
            Err(_) => {
                tracing::debug!(id = %self.id, timeout = ?self.write_timeout, "write timed out");
                Err(TransportError::SendFailed(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "peer stopped reading",
                )))
            }
        }
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut guard = self.reader.lock().await;
        // A released read half reads as end of stream.
        let Some(reader) = guard.as_mut() else {
            return Ok(None);
        };
        let mut buf = vec![0u8; self.chunk_size];
        let n = reader
            .read(&mut buf)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        if n == 0 {
            return Ok(None);
        }
        buf.truncate(n);
        tracing::trace!(id = %self.id, bytes = n, "read chunk");
        Ok(Some(buf))
    }

    async fn close(&self) -> Result<(), Self::Error> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let writer = self.writer.lock().await.take();
        let shut = match writer {
            Some(mut writer) => match writer.shutdown().await {
                Ok(()) => Ok(()),
                // The peer may already be gone; the link is closed either way.
                Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
                Err(e) => Err(TransportError::SendFailed(e)),
            },
            None => Ok(()),
        };
        // Waits for any in-flight read to finish before the socket goes.
        self.reader.lock().await.take();
        tracing::debug!(id = %self.id, "tcp link released");
        shut
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}

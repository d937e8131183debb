//! A live client connection and its receive task.
//!
//! Each [`Connection`] spawns one Tokio task that owns the read side of the
//! socket. The flow is:
//!   1. Read a chunk (bounded size, bounded time; a timeout just loops)
//!   2. Feed it to the frame reader
//!   3. For each complete frame: dispatch under the state write lock,
//!      release the lock, bump version counters, send any replies
//!   4. Stop on close request, end-of-stream, I/O error, a failed reply
//!      or broken framing

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use mystwire_protocol::{encode_frame, FrameReader, Opcode, Packet};
use mystwire_session::{
    wait_for, wait_for_packet, wait_until, Category, RawPacket, Router, SessionState,
    VersionCounters,
};
use mystwire_transport::{ConnectionId, Link, TcpLink};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

use crate::{ClientConfig, MystwireError};

/// One simulated client talking to one server.
///
/// Session state lives behind a lock that only the receive task writes;
/// the accessors here hand out clones or run a closure under a read lock.
pub struct Connection {
    id: ConnectionId,
    config: ClientConfig,
    link: Arc<TcpLink>,
    state: Arc<RwLock<SessionState>>,
    versions: Arc<VersionCounters>,
    closed: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl Connection {
    /// Connects to `config.addr` and starts the receive task.
    ///
    /// Never retries; a failed connect is returned to the caller.
    pub async fn open(config: ClientConfig) -> Result<Self, MystwireError> {
        let config = config.validated();
        let link = TcpLink::connect(
            &config.addr,
            config.connect_timeout(),
            config.read_chunk_size,
        )
        .await?
        .with_write_timeout(config.write_timeout());
        let link = Arc::new(link);
        let id = link.id();
        tracing::info!(%id, addr = %config.addr, "connected");

        let state = Arc::new(RwLock::new(SessionState::new()));
        let versions = Arc::new(VersionCounters::new());
        let closed = Arc::new(AtomicBool::new(false));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let receiver = Receiver {
            link: Arc::clone(&link),
            router: Router::standard(),
            reader: FrameReader::new(),
            state: Arc::clone(&state),
            versions: Arc::clone(&versions),
            closed: Arc::clone(&closed),
            shutdown: shutdown_rx,
            read_timeout: config.read_timeout(),
        };
        let task = tokio::spawn(receiver.run());

        Ok(Self {
            id,
            config,
            link,
            state,
            versions,
            closed,
            shutdown,
            task: Some(task),
        })
    }

    /// Shorthand for [`open`](Self::open) with default settings.
    pub async fn connect(addr: &str) -> Result<Self, MystwireError> {
        Self::open(ClientConfig::with_addr(addr)).await
    }

    /// Frames `payload` under `opcode` and writes it.
    ///
    /// A write failure, including a write that outlasts
    /// [`ClientConfig::write_timeout_ms`], closes the connection. A ping
    /// sent here is tracked so the server's answer is not echoed back.
    pub async fn send(&self, opcode: impl Into<u16>, payload: &[u8]) -> Result<(), MystwireError> {
        if self.is_closed() {
            return Err(MystwireError::Closed);
        }
        let opcode = opcode.into();
        let frame = encode_frame(opcode, payload)?;
        let is_ping = opcode == Opcode::Ping.as_u16();
        if is_ping {
            // Before the write, so the answer can never arrive first.
            self.state.write().await.ping_sent();
        }
        if let Err(e) = self.link.send(&frame).await {
            tracing::debug!(id = %self.id, error = %e, "send failed, closing");
            if is_ping {
                self.state.write().await.ping_unsent();
            }
            self.mark_closed();
            return Err(e.into());
        }
        tracing::debug!(id = %self.id, opcode, len = payload.len(), "sent frame");
        Ok(())
    }

    /// Encodes and sends a typed message.
    pub async fn send_packet<P: Packet>(&self, packet: &P) -> Result<(), MystwireError> {
        self.send(P::OPCODE, &packet.encode()).await
    }

    /// Stops the receive task, waits for it, then releases the socket.
    ///
    /// No handler runs after this returns.
    pub async fn close(&mut self) -> Result<(), MystwireError> {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(id = %self.id, error = %e, "receive task failed");
            }
        }
        let shut = self.link.close().await;
        self.closed.store(true, Ordering::Release);
        tracing::info!(id = %self.id, "connection closed");
        shut.map_err(Into::into)
    }

    /// Returns `true` once the connection can no longer be used.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// An owned copy of the current session state.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Runs `f` against the current state without cloning it.
    pub async fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&*self.state.read().await)
    }

    /// Current version of `category`. Take this before sending a request
    /// and pass it to [`wait_for`](Self::wait_for).
    pub fn version(&self, category: Category) -> u64 {
        self.versions.get(category)
    }

    pub fn versions(&self) -> &VersionCounters {
        &self.versions
    }

    /// Waits until `category` moves past `baseline`. `false` on timeout.
    pub async fn wait_for(&self, category: Category, baseline: u64, timeout: Duration) -> bool {
        wait_for(
            &self.versions,
            category,
            baseline,
            timeout,
            self.config.poll_interval(),
        )
        .await
    }

    /// Waits until `predicate` holds for the session state. `false` on
    /// timeout.
    pub async fn wait_until(
        &self,
        predicate: impl Fn(&SessionState) -> bool,
        timeout: Duration,
    ) -> bool {
        wait_until(&self.state, predicate, timeout, self.config.poll_interval()).await
    }

    /// Waits for a frame with `opcode` and removes it from the
    /// received-frame log. Frames already in the log count; call
    /// [`clear_received`](Self::clear_received) first to wait only for new
    /// ones.
    pub async fn wait_for_packet(
        &self,
        opcode: impl Into<u16>,
        timeout: Duration,
    ) -> Option<RawPacket> {
        wait_for_packet(
            &self.state,
            opcode.into(),
            timeout,
            self.config.poll_interval(),
        )
        .await
    }

    pub async fn clear_received(&self) {
        self.state.write().await.clear_received();
    }

    pub async fn clear_chat(&self) {
        self.state.write().await.clear_chat();
    }

    pub async fn clear_social(&self) {
        self.state.write().await.clear_social();
    }

    pub async fn clear_combat_log(&self) {
        self.state.write().await.clear_combat_log();
    }

    /// Removes and returns every frame that had no handler.
    pub async fn take_unhandled(&self) -> Vec<RawPacket> {
        self.state.write().await.take_unhandled()
    }

    fn mark_closed(&self) {
        self.closed.store(true, Ordering::Release);
        let _ = self.shutdown.send(true);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// State owned by the receive task.
struct Receiver {
    link: Arc<TcpLink>,
    router: Router,
    reader: FrameReader,
    state: Arc<RwLock<SessionState>>,
    versions: Arc<VersionCounters>,
    closed: Arc<AtomicBool>,
    shutdown: watch::Receiver<bool>,
    read_timeout: Duration,
}

impl Receiver {
    async fn run(mut self) {
        let id = self.link.id();
        loop {
            if *self.shutdown.borrow() {
                break;
            }
            let chunk = tokio::select! {
                biased;
                _ = self.shutdown.changed() => break,
                read = tokio::time::timeout(self.read_timeout, self.link.recv()) => match read {
                    Err(_) => continue,
                    Ok(Ok(Some(chunk))) => chunk,
                    Ok(Ok(None)) => {
                        tracing::info!(%id, "server closed the stream");
                        break;
                    }
                    Ok(Err(e)) => {
                        tracing::debug!(%id, error = %e, "receive failed");
                        break;
                    }
                },
            };
            tracing::trace!(%id, bytes = chunk.len(), "received chunk");

            self.reader.push(&chunk);
            if let Err(e) = self.drain().await {
                tracing::warn!(%id, error = %e, "dropping connection");
                break;
            }
        }
        self.closed.store(true, Ordering::Release);
        let _ = self.link.close().await;
        tracing::debug!(%id, "receive task stopped");
    }

    /// Handles every complete frame currently buffered.
    async fn drain(&mut self) -> Result<(), MystwireError> {
        while let Some(frame) = self.reader.next_frame()? {
            let fx = {
                let mut state = self.state.write().await;
                self.router.dispatch(&frame, &mut state)
            };
            // Bump only after the write lock is gone, so a reader that sees
            // the new version also sees the new state.
            self.versions.bump_all(&fx.bumps);

            for reply in fx.replies {
                let bytes = reply.to_bytes()?;
                // A write that timed out may have left half a frame on the
                // wire, so the stream cannot be trusted after a failure.
                self.link.send(&bytes).await?;
            }
        }
        Ok(())
    }
}

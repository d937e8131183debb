//! # Mystwire
//!
//! Client-side protocol engine for driving a game server from automated
//! test scenarios.
//!
//! A [`Connection`] owns one TCP socket and a background receive task. The
//! task slices the byte stream into frames, routes each frame to a handler
//! that updates the connection's [`SessionState`], and bumps a version
//! counter for the [`Category`] that changed. Scenario code sends requests
//! and waits on those counters.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use mystwire::prelude::*;
//!
//! # async fn scenario() -> Result<(), MystwireError> {
//! let mut conn = Connection::open(ClientConfig::with_addr("127.0.0.1:8080")).await?;
//!
//! let baseline = conn.version(Category::Auth);
//! conn.authenticate("user", "pass").await?;
//! if conn.wait_for(Category::Auth, baseline, Duration::from_secs(5)).await {
//!     assert!(conn.read(|s| s.authenticated).await);
//! }
//!
//! conn.close().await
//! # }
//! ```

mod actions;
mod config;
mod connection;
mod error;

pub use config::ClientConfig;
pub use connection::Connection;
pub use error::MystwireError;

pub use mystwire_protocol as protocol;
pub use mystwire_session::{Category, RawPacket, SessionState, POLL_INTERVAL};
pub use mystwire_transport::ConnectionId;

/// Installs a `fmt` tracing subscriber filtered by `RUST_LOG`, defaulting to
/// `info`. Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Convenience re-exports for scenario code.
pub mod prelude {
    pub use crate::{init_tracing, ClientConfig, Connection, MystwireError};
    pub use mystwire_protocol::{client, server, Opcode, Packet};
    pub use mystwire_session::{Category, SessionState};
}

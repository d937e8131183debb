//! Client configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::MystwireError;

/// Settings for one [`Connection`](crate::Connection).
///
/// Every field has a default, so a config file only needs the fields it
/// changes:
///
/// ```rust
/// let config = mystwire::ClientConfig::from_json_str(r#"{ "addr": "10.0.0.5:8080" }"#).unwrap();
/// assert_eq!(config.read_chunk_size, 4096);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server address, `host:port`.
    pub addr: String,
    /// Bound on the TCP connect.
    pub connect_timeout_ms: u64,
    /// Bound on one socket read. Expiry is not an error; it only gives the
    /// receive task a chance to notice a close request.
    pub read_timeout_ms: u64,
    /// Bound on one socket write. Expiry fails the send and closes the
    /// connection.
    pub write_timeout_ms: u64,
    /// Largest number of bytes taken per read.
    pub read_chunk_size: usize,
    /// Delay between checks in `wait_for` and `wait_until`.
    pub poll_interval_ms: u64,
    /// Client build sent with authentication.
    pub build_version: i32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            connect_timeout_ms: 5_000,
            read_timeout_ms: 1_000,
            write_timeout_ms: 5_000,
            read_chunk_size: 4_096,
            poll_interval_ms: 50,
            build_version: 1,
        }
    }
}

impl ClientConfig {
    /// Largest accepted read size: one maximal frame.
    pub const MAX_READ_CHUNK: usize = 65_535;
    /// Slowest accepted polling interval.
    pub const MAX_POLL_INTERVAL_MS: u64 = 1_000;

    /// Default settings aimed at `addr`.
    pub fn with_addr(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Parses a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, MystwireError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MystwireError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Replaces values that would stall or spin the client.
    ///
    /// Called by [`Connection::open`](crate::Connection::open).
    pub fn validated(mut self) -> Self {
        if self.connect_timeout_ms == 0 {
            warn!("connect_timeout_ms is 0, using default");
            self.connect_timeout_ms = Self::default().connect_timeout_ms;
        }
        if self.read_timeout_ms == 0 {
            warn!("read_timeout_ms is 0, using default");
            self.read_timeout_ms = Self::default().read_timeout_ms;
        }
        if self.write_timeout_ms == 0 {
            warn!("write_timeout_ms is 0, using default");
            self.write_timeout_ms = Self::default().write_timeout_ms;
        }
        if self.read_chunk_size == 0 || self.read_chunk_size > Self::MAX_READ_CHUNK {
            warn!(
                size = self.read_chunk_size,
                max = Self::MAX_READ_CHUNK,
                "read_chunk_size out of range, clamping"
            );
            self.read_chunk_size = self.read_chunk_size.clamp(1, Self::MAX_READ_CHUNK);
        }
        if self.poll_interval_ms == 0 || self.poll_interval_ms > Self::MAX_POLL_INTERVAL_MS {
            warn!(
                interval = self.poll_interval_ms,
                max = Self::MAX_POLL_INTERVAL_MS,
                "poll_interval_ms out of range, clamping"
            );
            self.poll_interval_ms = self.poll_interval_ms.clamp(1, Self::MAX_POLL_INTERVAL_MS);
        }
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.addr, "127.0.0.1:8080");
        assert_eq!(config.read_timeout(), Duration::from_secs(1));
        assert_eq!(config.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.build_version, 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            ClientConfig::from_json_str(r#"{"addr":"10.0.0.1:9000","build_version":7}"#).unwrap();
        assert_eq!(config.addr, "10.0.0.1:9000");
        assert_eq!(config.build_version, 7);
        assert_eq!(config.connect_timeout_ms, 5_000);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = ClientConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, MystwireError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ClientConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, MystwireError::ConfigIo(_)));
    }

    #[test]
    fn test_validated_clamps() {
        let config = ClientConfig {
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            read_chunk_size: 0,
            poll_interval_ms: 60_000,
            ..ClientConfig::default()
        }
        .validated();
        assert_eq!(config.connect_timeout_ms, 5_000);
        assert_eq!(config.read_timeout_ms, 1_000);
        assert_eq!(config.write_timeout(), Duration::from_secs(5));
        assert_eq!(config.read_chunk_size, 1);
        assert_eq!(config.poll_interval_ms, ClientConfig::MAX_POLL_INTERVAL_MS);

        let big = ClientConfig {
            read_chunk_size: 1 << 20,
            ..ClientConfig::default()
        }
        .validated();
        assert_eq!(big.read_chunk_size, ClientConfig::MAX_READ_CHUNK);
    }

    #[test]
    fn test_with_addr() {
        let config = ClientConfig::with_addr("game:1234");
        assert_eq!(config.addr, "game:1234");
        assert_eq!(config.read_chunk_size, 4_096);
    }
}

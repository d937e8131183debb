//! Client session layer for mystwire.
//!
//! This crate turns decoded frames into an observable world view:
//!
//! 1. **Routing** ([`Router`]): an opcode-keyed table of handlers, built once
//!    per connection.
//! 2. **State** ([`SessionState`]): everything the client has been told,
//!    from the character roster to the trade window.
//! 3. **Versions** ([`VersionCounters`]): one monotonic counter per
//!    [`Category`], bumped after each state change.
//! 4. **Waiting** ([`wait_for`], [`wait_until`], [`wait_for_packet`]): poll
//!    a counter, a predicate or the received-frame log, with a timeout.
//!
//! # How it fits in the stack
//!
//! ```text
//! Connection (above)  ← owns the state, runs the receive task, calls dispatch
//!     ↕
//! Session Layer (this crate)  ← applies messages, versions changes
//!     ↕
//! Protocol Layer (below)  ← Frame, Opcode, typed packets
//! ```

mod handlers;
mod router;
mod state;
mod version;
mod wait;

pub use router::{Apply, Effects, Handler, Router};
pub use state::{
    ArenaState, ChatLine, GuildEvent, Keepalive, Progress, QuestLog, RawPacket, SessionState,
    RECEIVED_LOG_CAPACITY,
};
pub use version::{Category, VersionCounters};
pub use wait::{poll_for, poll_until, wait_for, wait_for_packet, wait_until, POLL_INTERVAL};

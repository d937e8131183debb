//! Waiting for the receive task to catch up.
//!
//! Every wait polls. The caller takes a baseline with
//! [`VersionCounters::get`] *before* sending the request that should move the
//! counter, then waits for the counter to pass it.

use std::future::Future;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::{Category, RawPacket, SessionState, VersionCounters};

/// Default delay between two checks.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs `check` until it yields a value or `timeout` passes.
///
/// The check always runs at least once, so a zero timeout still reports a
/// value that is already there.
pub async fn poll_for<T, F, Fut>(mut check: F, timeout: Duration, poll: Duration) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;
    let poll = poll.max(Duration::from_millis(1));
    loop {
        if let Some(value) = check().await {
            return Some(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        tokio::time::sleep(poll.min(deadline - now)).await;
    }
}

/// Runs `check` until it returns `true` or `timeout` passes.
pub async fn poll_until<F, Fut>(mut check: F, timeout: Duration, poll: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    poll_for(
        || {
            let pending = check();
            async move { pending.await.then_some(()) }
        },
        timeout,
        poll,
    )
    .await
    .is_some()
}

/// Waits until `category` moves past `baseline`.
pub async fn wait_for(
    counters: &VersionCounters,
    category: Category,
    baseline: u64,
    timeout: Duration,
    poll: Duration,
) -> bool {
    let reached = poll_until(
        || std::future::ready(counters.get(category) > baseline),
        timeout,
        poll,
    )
    .await;
    if !reached {
        tracing::debug!(%category, baseline, ?timeout, "wait timed out");
    }
    reached
}

/// Waits until `predicate` holds for the session state.
pub async fn wait_until<P>(
    state: &RwLock<SessionState>,
    predicate: P,
    timeout: Duration,
    poll: Duration,
) -> bool
where
    P: Fn(&SessionState) -> bool,
{
    let predicate = &predicate;
    poll_until(
        || async move { predicate(&*state.read().await) },
        timeout,
        poll,
    )
    .await
}

/// Waits for a frame with `opcode` and removes it from
/// [`SessionState::received`].
///
/// Frames that arrived before the call count too; clear the log first to
/// wait only for new ones.
pub async fn wait_for_packet(
    state: &RwLock<SessionState>,
    opcode: u16,
    timeout: Duration,
    poll: Duration,
) -> Option<RawPacket> {
    let packet = poll_for(
        || async move { state.write().await.take_received(opcode) },
        timeout,
        poll,
    )
    .await;
    if packet.is_none() {
        tracing::debug!(opcode, ?timeout, "packet wait timed out");
    }
    packet
}

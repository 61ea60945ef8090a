//! Broadcast dispatcher
//!
//! Delivers one serialized event to a computed target set, pruning
//! connections that fail mid-send. Delivery is fire-and-forget for the
//! domain operation that triggered it: `notify_*` hand the broadcast to
//! a background task so the request never waits on, or fails because
//! of, subscriber I/O.
//!
//! No ordering is guaranteed across racing broadcast calls (for example
//! a `poll_updated` and a `poll_closed` for the same poll triggered by
//! near-simultaneous requests). Events carry identifiers only and
//! clients re-fetch state over REST, so out-of-order delivery
//! self-heals.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::events::{ChatMessage, PollEvent};
use super::registry::{ConnectionHandle, ConnectionRegistry};

/// Fan-out component over a shared [`ConnectionRegistry`]
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ConnectionRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Deliver `event` to every connection registered at call time.
    /// Connections that register later do not receive this event
    /// (snapshot semantics).
    pub fn broadcast_all(&self, event: &PollEvent) {
        match serde_json::to_string(event) {
            Ok(payload) => self.fan_out(self.registry.all_connections(), &payload),
            Err(e) => warn!("failed to serialize event: {}", e),
        }
    }

    /// Deliver `event` to the poll's subscribers at call time
    pub fn broadcast_to_poll(&self, event: &PollEvent, poll_id: i64) {
        match serde_json::to_string(event) {
            Ok(payload) => self.fan_out(self.registry.subscribers_for(poll_id), &payload),
            Err(e) => warn!("failed to serialize event: {}", e),
        }
    }

    /// Relay inbound chat text to every connection as `{"message": ...}`
    pub fn relay_global(&self, text: &str) {
        match serde_json::to_string(&ChatMessage::new(text)) {
            Ok(payload) => self.fan_out(self.registry.all_connections(), &payload),
            Err(e) => warn!("failed to serialize chat message: {}", e),
        }
    }

    /// Fire-and-forget notification to a poll's room after a mutation
    /// committed; delivery happens on a background task so the caller
    /// never waits on subscriber I/O
    pub fn notify_poll_changed(&self, event: PollEvent, poll_id: i64) {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.broadcast_to_poll(&event, poll_id);
        });
    }

    /// Fire-and-forget notification to the global channel
    pub fn notify_global(&self, event: PollEvent) {
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.broadcast_all(&event);
        });
    }

    /// Deliver the payload to every target, pruning targets whose
    /// channel is gone. One failure never aborts delivery to the rest.
    fn fan_out(&self, targets: Vec<ConnectionHandle>, payload: &str) {
        for handle in targets {
            if handle.tx.send(payload.to_owned()).is_err() {
                // Receiver dropped: the writer task hit a dead socket.
                debug!("pruning dead connection {}", handle.id);
                self.registry.unregister(handle.id);
            }
        }
    }
}

/// Periodically broadcast a heartbeat to all connections
///
/// Runs until the process exits. Half-open connections are detected by
/// the ordinary send-failure path: a failed heartbeat delivery prunes
/// the connection.
pub async fn run_heartbeat(dispatcher: Dispatcher, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        dispatcher.broadcast_all(&PollEvent::Heartbeat);
    }
}

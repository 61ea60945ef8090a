//! Broadcast event types for real-time poll updates
//!
//! Events carry identifiers only, never entity snapshots; clients
//! re-fetch authoritative poll state over REST, which makes stale or
//! out-of-order delivery harmless.

use serde::{Deserialize, Serialize};

/// Poll events broadcast to WebSocket clients
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PollEvent {
    /// Poll state changed (created, edited, vote cast, like toggled)
    PollUpdated { poll_id: i64 },

    /// The poll was closed
    PollClosed { poll_id: i64 },

    /// The poll was deleted
    PollDeleted { poll_id: i64 },

    /// Liveness probe; a send failure prunes the connection
    Heartbeat,
}

/// Relayed chat-style message on the global channel
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub message: String,
}

impl ChatMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

//! Real-time fan-out subsystem
//!
//! Tracks live WebSocket connections globally and per poll room, and
//! pushes state-change notifications to the right subscriber set with
//! best-effort delivery and automatic pruning of dead connections.
//!
//! # Modules
//!
//! - [`registry`]: the single shared, mutex-guarded structure holding
//!   the global connection set and the poll rooms
//! - [`dispatcher`]: snapshots a target set under the lock, releases it,
//!   then delivers; a failed delivery unregisters that one connection
//!   and never aborts the rest
//! - [`handler`]: the per-connection accept/receive loop on axum
//!   WebSockets
//! - [`events`]: the tagged JSON event shapes pushed to clients

pub mod dispatcher;
pub mod events;
pub mod handler;
pub mod registry;

pub use dispatcher::{run_heartbeat, Dispatcher};
pub use events::{ChatMessage, PollEvent};
pub use registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};

//! QuickPoll Server
//!
//! A real-time opinion-polling platform: users create polls, vote and
//! like, and every connected WebSocket client receives live updates
//! when poll state changes.
//!
//! # Modules
//!
//! - `types`: Core domain structures (User, Poll, Vote, Like, ...)
//! - `store`: Persistent storage engine with JSON file backing
//! - `realtime`: Connection registry, broadcast dispatcher and
//!   WebSocket lifecycle
//! - `api`: Axum router, REST handlers and shared state
//! - `utils`: Atomic file writes

pub mod api;
pub mod realtime;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use api::state::AppState;
pub use realtime::{ConnectionRegistry, Dispatcher, PollEvent};
pub use store::{PollStore, StoreError, StoreResult};
pub use types::{Like, Poll, PollDetail, PollOption, User, Vote};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Shared application state

use std::sync::Arc;

use crate::realtime::{ConnectionRegistry, Dispatcher};
use crate::store::PollStore;

/// State shared by every HTTP and WebSocket handler
pub struct AppState {
    pub store: Arc<PollStore>,
    pub registry: Arc<ConnectionRegistry>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(store: Arc<PollStore>) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        Self {
            store,
            registry,
            dispatcher,
        }
    }
}

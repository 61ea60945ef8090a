//! Connection registry
//!
//! Tracks every live WebSocket connection globally and per poll room.
//! One mutex covers both the global set and the room map, so a reader
//! never observes a connection mid-removal. Registry operations are
//! fast in-memory work; actual socket writes happen elsewhere, on
//! snapshots taken under the lock.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Opaque identity of one registered connection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Sending half of one connection: serialized frames pushed here are
/// drained into the socket by the connection's writer task
#[derive(Clone, Debug)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    pub tx: mpsc::UnboundedSender<String>,
}

#[derive(Default)]
struct RegistryInner {
    /// All live connections
    connections: HashMap<ConnectionId, ConnectionHandle>,
    /// Poll id -> subscribed connections. Entries are removed eagerly
    /// when their last subscriber leaves.
    rooms: HashMap<i64, HashSet<ConnectionId>>,
}

/// Shared registry of live connections and poll subscriptions
///
/// All operations may be called concurrently from connection tasks and
/// the dispatcher.
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    inner: Mutex<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Add a connection to the global set and, if `poll_id` is given, to
    /// that poll's room. The connection is a broadcast target as soon as
    /// this returns.
    pub fn register(
        &self,
        tx: mpsc::UnboundedSender<String>,
        poll_id: Option<i64>,
    ) -> ConnectionId {
        let id = ConnectionId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let mut inner = self.inner.lock();
        inner.connections.insert(id, ConnectionHandle { id, tx });
        if let Some(poll_id) = poll_id {
            inner.rooms.entry(poll_id).or_default().insert(id);
        }
        id
    }

    /// Remove a connection from the global set and from every room it
    /// belongs to. Unknown ids are a no-op, which guards against
    /// double-disconnect races between the receive loop and the
    /// dispatcher's failure pruning.
    pub fn unregister(&self, id: ConnectionId) {
        let mut inner = self.inner.lock();
        inner.connections.remove(&id);
        inner.rooms.retain(|_, members| {
            members.remove(&id);
            !members.is_empty()
        });
    }

    /// Leave one poll room without disconnecting; global membership is
    /// untouched. A no-op if the connection is not in that room.
    pub fn unsubscribe(&self, id: ConnectionId, poll_id: i64) {
        let mut inner = self.inner.lock();
        if let Some(members) = inner.rooms.get_mut(&poll_id) {
            members.remove(&id);
            if members.is_empty() {
                inner.rooms.remove(&poll_id);
            }
        }
    }

    /// Snapshot of the connections currently subscribed to a poll
    /// (empty if none)
    pub fn subscribers_for(&self, poll_id: i64) -> Vec<ConnectionHandle> {
        let inner = self.inner.lock();
        match inner.rooms.get(&poll_id) {
            Some(members) => members
                .iter()
                .filter_map(|id| inner.connections.get(id).cloned())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Snapshot of all live connections
    pub fn all_connections(&self) -> Vec<ConnectionHandle> {
        self.inner.lock().connections.values().cloned().collect()
    }

    /// Number of live connections
    pub fn connection_count(&self) -> usize {
        self.inner.lock().connections.len()
    }

    /// Whether a connection is still in the global set
    pub fn is_registered(&self, id: ConnectionId) -> bool {
        self.inner.lock().connections.contains_key(&id)
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(
        registry: &ConnectionRegistry,
        poll_id: Option<i64>,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (registry.register(tx, poll_id), rx)
    }

    fn ids(handles: &[ConnectionHandle]) -> Vec<ConnectionId> {
        let mut ids: Vec<ConnectionId> = handles.iter().map(|h| h.id).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_room_membership_implies_global() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = connect(&registry, Some(1));
        let (b, _rx_b) = connect(&registry, Some(2));

        let global = ids(&registry.all_connections());
        for handle in registry.subscribers_for(1) {
            assert!(global.contains(&handle.id));
        }
        assert!(global.contains(&a));
        assert!(global.contains(&b));
    }

    #[test]
    fn test_unregister_removes_from_rooms_too() {
        let registry = ConnectionRegistry::new();
        let (a, _rx) = connect(&registry, Some(1));

        registry.unregister(a);

        assert!(!registry.is_registered(a));
        assert!(registry.subscribers_for(1).is_empty());
        assert_eq!(registry.connection_count(), 0);
    }

    #[test]
    fn test_double_unregister_is_noop() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = connect(&registry, Some(1));
        let (_b, _rx_b) = connect(&registry, None);

        registry.unregister(a);
        // Second removal and an unknown id both leave the registry as-is
        registry.unregister(a);
        registry.unregister(ConnectionId(12345));

        assert_eq!(registry.connection_count(), 1);
    }

    #[test]
    fn test_unsubscribe_keeps_global_membership() {
        let registry = ConnectionRegistry::new();
        let (a, _rx) = connect(&registry, Some(1));

        registry.unsubscribe(a, 1);

        assert!(registry.is_registered(a));
        assert!(registry.subscribers_for(1).is_empty());
    }

    #[test]
    fn test_empty_rooms_are_garbage_collected() {
        let registry = ConnectionRegistry::new();
        let (a, _rx) = connect(&registry, Some(42));

        registry.unsubscribe(a, 42);
        assert!(registry.inner.lock().rooms.is_empty());
    }

    #[test]
    fn test_rooms_are_isolated() {
        let registry = ConnectionRegistry::new();
        let (a, _rx_a) = connect(&registry, Some(1));
        let (b, _rx_b) = connect(&registry, Some(1));
        let (c, _rx_c) = connect(&registry, Some(2));

        assert_eq!(ids(&registry.subscribers_for(1)), {
            let mut v = vec![a, b];
            v.sort();
            v
        });
        assert_eq!(ids(&registry.subscribers_for(2)), vec![c]);
        assert!(registry.subscribers_for(99).is_empty());
    }

    #[test]
    fn test_reads_without_mutation_are_stable() {
        let registry = ConnectionRegistry::new();
        let (_a, _rx_a) = connect(&registry, Some(1));
        let (_b, _rx_b) = connect(&registry, Some(1));

        assert_eq!(
            ids(&registry.subscribers_for(1)),
            ids(&registry.subscribers_for(1))
        );
        assert_eq!(
            ids(&registry.all_connections()),
            ids(&registry.all_connections())
        );
    }

    #[test]
    fn test_concurrent_register_unregister() {
        use std::sync::Arc;

        let registry = Arc::new(ConnectionRegistry::new());
        let mut handles = Vec::new();

        for poll_id in 0..4i64 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                for _ in 0..100 {
                    let (tx, _rx) = mpsc::unbounded_channel();
                    let id = registry.register(tx, Some(poll_id));
                    registry.unregister(id);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.connection_count(), 0);
        for poll_id in 0..4 {
            assert!(registry.subscribers_for(poll_id).is_empty());
        }
    }
}

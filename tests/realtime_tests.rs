//! Integration tests for the real-time fan-out subsystem

use std::sync::Arc;

use tokio::sync::mpsc;

use quickpoll::realtime::{ConnectionId, ConnectionRegistry, Dispatcher, PollEvent};

fn setup() -> (Arc<ConnectionRegistry>, Dispatcher) {
    let registry = Arc::new(ConnectionRegistry::new());
    let dispatcher = Dispatcher::new(Arc::clone(&registry));
    (registry, dispatcher)
}

fn connect(
    registry: &ConnectionRegistry,
    poll_id: Option<i64>,
) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (registry.register(tx, poll_id), rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut messages = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        messages.push(msg);
    }
    messages
}

#[tokio::test]
async fn test_room_broadcast_reaches_exactly_the_room() {
    let (registry, dispatcher) = setup();
    let (_a, mut rx_a) = connect(&registry, Some(1));
    let (_b, mut rx_b) = connect(&registry, Some(1));
    let (_c, mut rx_c) = connect(&registry, None);
    let (_d, mut rx_d) = connect(&registry, Some(2));

    dispatcher.broadcast_to_poll(&PollEvent::PollUpdated { poll_id: 1 }, 1);

    assert_eq!(drain(&mut rx_a).len(), 1);
    assert_eq!(drain(&mut rx_b).len(), 1);
    assert!(drain(&mut rx_c).is_empty());
    assert!(drain(&mut rx_d).is_empty());
}

#[tokio::test]
async fn test_global_broadcast_reaches_everyone() {
    let (registry, dispatcher) = setup();
    let (_a, mut rx_a) = connect(&registry, Some(1));
    let (_b, mut rx_b) = connect(&registry, Some(1));
    let (_c, mut rx_c) = connect(&registry, None);

    dispatcher.broadcast_all(&PollEvent::PollUpdated { poll_id: 1 });

    for rx in [&mut rx_a, &mut rx_b, &mut rx_c] {
        let messages = drain(rx);
        assert_eq!(messages, vec![r#"{"type":"poll_updated","poll_id":1}"#]);
    }
}

#[tokio::test]
async fn test_failed_target_does_not_stop_the_rest() {
    let (registry, dispatcher) = setup();

    let mut receivers = Vec::new();
    let mut ids = Vec::new();
    for _ in 0..5 {
        let (id, rx) = connect(&registry, Some(7));
        ids.push(id);
        receivers.push(rx);
    }

    // Kill the middle connection's writer
    let dead_id = ids[2];
    drop(receivers.remove(2));

    dispatcher.broadcast_to_poll(&PollEvent::PollClosed { poll_id: 7 }, 7);

    for rx in receivers.iter_mut() {
        assert_eq!(drain(rx).len(), 1);
    }
    assert!(!registry.is_registered(dead_id));
    assert_eq!(registry.connection_count(), 4);
    assert_eq!(registry.subscribers_for(7).len(), 4);
}

#[tokio::test]
async fn test_late_joiners_miss_earlier_broadcasts() {
    let (registry, dispatcher) = setup();
    let (_a, mut rx_a) = connect(&registry, Some(1));

    dispatcher.broadcast_to_poll(&PollEvent::PollUpdated { poll_id: 1 }, 1);

    // B registers after the snapshot was taken and delivered
    let (_b, mut rx_b) = connect(&registry, Some(1));

    assert_eq!(drain(&mut rx_a).len(), 1);
    assert!(drain(&mut rx_b).is_empty());
}

#[tokio::test]
async fn test_unsubscribe_keeps_global_only() {
    let (registry, dispatcher) = setup();
    let (a, mut rx) = connect(&registry, Some(1));

    registry.unsubscribe(a, 1);

    assert!(registry.is_registered(a));
    assert!(registry.subscribers_for(1).is_empty());

    dispatcher.broadcast_to_poll(&PollEvent::PollUpdated { poll_id: 1 }, 1);
    assert!(drain(&mut rx).is_empty());

    dispatcher.broadcast_all(&PollEvent::PollUpdated { poll_id: 1 });
    assert_eq!(drain(&mut rx).len(), 1);
}

#[tokio::test]
async fn test_unregister_is_idempotent_under_races() {
    let (registry, dispatcher) = setup();
    let (a, rx) = connect(&registry, Some(1));
    let (_b, mut rx_b) = connect(&registry, Some(1));

    // Simulate the receive loop and the dispatcher both tearing the
    // connection down: dispatcher prunes on failed send, then the loop
    // unregisters again
    drop(rx);
    dispatcher.broadcast_to_poll(&PollEvent::PollUpdated { poll_id: 1 }, 1);
    registry.unregister(a);
    registry.unregister(a);

    assert_eq!(registry.connection_count(), 1);
    assert_eq!(drain(&mut rx_b).len(), 1);
}

#[tokio::test]
async fn test_notify_decouples_from_caller() {
    let (registry, dispatcher) = setup();
    let (_a, mut rx) = connect(&registry, Some(4));

    // notify_* returns immediately; delivery happens on a spawned task
    dispatcher.notify_poll_changed(PollEvent::PollDeleted { poll_id: 4 }, 4);
    dispatcher.notify_global(PollEvent::PollDeleted { poll_id: 4 });

    // Room + global copies both arrive
    assert!(rx.recv().await.is_some());
    assert!(rx.recv().await.is_some());
}

#[tokio::test]
async fn test_chat_relay_shape() {
    let (registry, dispatcher) = setup();
    let (_a, mut rx) = connect(&registry, None);

    dispatcher.relay_global("lunch time");

    assert_eq!(drain(&mut rx), vec![r#"{"message":"lunch time"}"#]);
}

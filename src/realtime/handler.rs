//! WebSocket connection lifecycle
//!
//! One long-lived task per connection: register with the registry
//! (room-scoped for `/ws/:poll_id`), split the socket, drain outbound
//! frames through a writer task, and loop on inbound messages until the
//! peer disconnects, then unregister.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::state::AppState;

/// Upgrade handler for the global channel at `/ws`
pub async fn ws_global_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, None))
}

/// Upgrade handler for a poll room at `/ws/:poll_id`
///
/// The poll id is not validated here; subscribing to a nonexistent poll
/// simply yields a room that never receives events.
pub async fn ws_poll_handler(
    ws: WebSocketUpgrade,
    Path(poll_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, Some(poll_id)))
}

/// Handle an individual WebSocket connection from registration to
/// disconnect
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, poll_id: Option<i64>) {
    let (mut sink, mut stream) = socket.split();

    // Outbound frames are queued here and drained by the writer task, so
    // broadcasts never block on this client's socket
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let id = state.registry.register(tx.clone(), poll_id);
    info!("{} connected (poll: {:?})", id, poll_id);

    // Writer task: first failed write ends it. The dropped receiver then
    // makes dispatcher sends to this connection fail, which prunes it
    // from the registry.
    let writer = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sink.send(Message::Text(payload)).await.is_err() {
                debug!("socket write failed, stopping writer");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => match poll_id {
                // Global channel: relay to every connection
                None => state.dispatcher.relay_global(&text),
                // Poll room: echo back to the sender only. Inbound
                // messages trigger no domain action; all mutations go
                // through the REST API.
                Some(_) => {
                    if tx.send(format!("Message: {}", text)).is_err() {
                        break;
                    }
                }
            },
            Ok(Message::Close(_)) => break,
            // Ping/pong is answered by the protocol layer; binary input
            // is ignored
            Ok(_) => {}
            Err(_) => break,
        }
    }

    state.registry.unregister(id);
    info!("{} disconnected", id);

    // Dropping our sender (the registry already dropped its clone) lets
    // the writer task drain remaining frames and exit
    drop(tx);
    let _ = writer.await;
}

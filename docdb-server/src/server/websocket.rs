//! Websocket endpoint bridging a socket to its session actor.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::HeaderMap,
    response::IntoResponse,
};
use docdb_shared::ServerFrame;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::server::state::AppState;
use crate::session::{session_identity, spawn_session, MAILBOX_CAPACITY};

/// Upgrade to a websocket and start one session for the connection.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let identity = session_identity(&headers);
    ws.on_upgrade(move |socket| pump(socket, state, identity))
}

/// Forward text frames into the session mailbox and its replies back out.
async fn pump(socket: WebSocket, state: AppState, identity: String) {
    let (mut sink, mut stream) = socket.split();
    let (inbox_tx, inbox_rx) = mpsc::channel::<String>(MAILBOX_CAPACITY);
    let (outbox_tx, mut outbox_rx) = mpsc::channel::<ServerFrame>(MAILBOX_CAPACITY);

    let actor = spawn_session(state.session(identity), inbox_rx, outbox_tx);

    let writer = tokio::spawn(async move {
        while let Some(frame) = outbox_rx.recv().await {
            if let Err(e) = sink.send(Message::Text(frame.to_json())).await {
                debug!(error = %e, "Socket write failed");
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => {
                if inbox_tx.send(text).await.is_err() {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "Socket read failed");
                break;
            }
        }
    }

    drop(inbox_tx);
    if let Err(e) = actor.await {
        error!(error = %e, "Session task failed");
    }
    if let Err(e) = writer.await {
        error!(error = %e, "Socket writer task failed");
    }
}

//! WebSocket connection handlers.
//!
//! Each accepted connection runs two tasks: a pusher that writes history
//! snapshots from the connection's channel to the socket, and a receiver that
//! decodes, authorizes, and forwards inbound frames. Whichever ends first
//! tears the other down and deregisters the connection. Nothing is reported
//! to the client on failure; the socket just closes.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{ConnectionId, InboundMessage, outbound_channel},
    infrastructure::dto::websocket::MessageDto,
    ui::state::AppState,
    usecase::ReceiveError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives history snapshots from the rx channel and pushes them to the WebSocket sender.
///
/// A failed socket write ends the task, which drops `rx`; the broadcast
/// engine's next delivery to this connection then fails and prunes it. A
/// peer that stops reading fills `rx` and is pruned the same way.
///
/// # Arguments
///
/// * `rx` - Channel receiver fed by the broadcast engine
/// * `sender` - WebSocket sink to send snapshots to this client
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Decode one data frame. Control frames yield `None`.
fn decode_frame(frame: &Message) -> Option<Result<MessageDto, serde_json::Error>> {
    match frame {
        Message::Text(text) => Some(serde_json::from_str(text.as_str())),
        Message::Binary(bytes) => Some(serde_json::from_slice(bytes)),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) => None,
    }
}

/// Read frames until close, a read error, a malformed frame, or a rejected token.
fn receiver_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::debug!("Read error on connection '{}': {}", connection_id, e);
                    break;
                }
            };

            if let Message::Close(_) = frame {
                tracing::debug!("Connection '{}' sent close frame", connection_id);
                break;
            }

            let dto = match decode_frame(&frame) {
                Some(Ok(dto)) => dto,
                Some(Err(e)) => {
                    tracing::debug!("Malformed frame on connection '{}': {}", connection_id, e);
                    break;
                }
                None => continue,
            };

            match state
                .receive_message_usecase
                .execute(InboundMessage::from(dto))
                .await
            {
                Ok(disposition) => {
                    tracing::debug!("Connection '{}': {:?}", connection_id, disposition);
                }
                Err(ReceiveError::Unauthorized(e)) => {
                    tracing::warn!("Connection '{}' rejected: {}", connection_id, e);
                    break;
                }
                Err(ReceiveError::Engine(e)) => {
                    tracing::error!("Connection '{}' dropped: {}", connection_id, e);
                    break;
                }
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();

    // Create a bounded channel for this connection to receive history snapshots
    let (tx, rx) = outbound_channel();

    // Register and queue the join replay
    let connection_id = match state.connect_connection_usecase.execute(tx).await {
        Ok(connection_id) => connection_id,
        Err(e) => {
            tracing::error!("Failed to accept connection: {}", e);
            return;
        }
    };
    tracing::info!("Connection '{}' accepted", connection_id);

    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = receiver_loop(receiver, state.clone(), connection_id);

    // If any one of the tasks exit, abort the other.
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state
        .disconnect_connection_usecase
        .execute(&connection_id)
        .await;
    let remaining = state
        .disconnect_connection_usecase
        .count_remaining_connections()
        .await;
    tracing::info!(
        "Connection '{}' closed ({} remaining)",
        connection_id,
        remaining
    );
}

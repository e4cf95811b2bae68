//! WebSocket connection handlers.
//!
//! Session lifecycle: `connected` on upgrade, `joined` after a `join` event,
//! `disconnected` when the socket closes. Every `message` event gets exactly
//! one `message` reply on the same connection.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MessageContent, fallback::socket_error_text},
    infrastructure::dto::{
        conversion::optional_user_id,
        websocket::{ClientEvent, ServerMessage},
    },
    ui::state::AppState,
    usecase::RelayOutcome,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let connection_id = ConnectionId::generate();
    ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Replies produced for this connection go through the channel, so they
/// reach the socket in the order they were produced.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns a task that handles this connection's events one at a time, in arrival order.
///
/// Backend calls run here, so the reader keeps watching the socket and
/// notices a close while a call is still in flight.
fn event_loop(
    mut events: mpsc::UnboundedReceiver<String>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(text) = events.recv().await {
            handle_event(&state, &connection_id, &text).await;
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, connection_id: ConnectionId) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    state
        .connect_session_usecase
        .execute(connection_id.clone(), tx)
        .await;

    let (event_tx, event_rx) = mpsc::unbounded_channel::<String>();
    let recv_connection_id = connection_id.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", recv_connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if event_tx.send(text.as_str().to_owned()).is_err() {
                        break;
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);
    let event_task = event_loop(event_rx, state.clone(), connection_id.clone());

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };
    // A backend call still in flight has nobody left to answer
    event_task.abort();
    let _ = event_task.await;

    state
        .disconnect_session_usecase
        .execute(&connection_id)
        .await;
}

async fn handle_event(state: &AppState, connection_id: &ConnectionId, text: &str) {
    match ClientEvent::parse(text) {
        ClientEvent::Join { user_id } => {
            state
                .join_session_usecase
                .execute(connection_id.clone(), optional_user_id(user_id))
                .await;
        }
        ClientEvent::Message { message, user_id } => {
            let reply = relay_message(state, connection_id, message, user_id).await;
            send_reply(state, connection_id, &reply).await;
        }
    }
}

/// Relay one chat event and build the single reply for it
async fn relay_message(
    state: &AppState,
    connection_id: &ConnectionId,
    message: Option<String>,
    user_id: Option<String>,
) -> ServerMessage {
    let content = match MessageContent::new(message.unwrap_or_default()) {
        Ok(content) => content,
        Err(e) => return ServerMessage::failure(e.to_string(), state.timestamp()),
    };

    let user_id = state
        .join_session_usecase
        .resolve_user(connection_id, optional_user_id(user_id))
        .await;

    match state.relay_message_usecase.execute(content, user_id).await {
        RelayOutcome::Answered { response, success } => {
            ServerMessage::new(response, state.timestamp(), success)
        }
        RelayOutcome::Unavailable(error) => {
            ServerMessage::failure(socket_error_text(&error), state.timestamp())
        }
    }
}

async fn send_reply(state: &AppState, connection_id: &ConnectionId, reply: &ServerMessage) {
    let json = match serde_json::to_string(reply) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize reply for '{}': {}", connection_id, e);
            return;
        }
    };

    if let Err(e) = state.send_reply_usecase.execute(connection_id, &json).await {
        tracing::warn!("Failed to reply to '{}': {}", connection_id, e);
    }
}

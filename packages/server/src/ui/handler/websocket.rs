//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{Stream, StreamExt},
};
use serde::Deserialize;
use tokio::sync::{mpsc, watch};

use crate::{
    domain::{
        ChatText, ChatUser, ConnectionId, ConnectionIdFactory, MediaAddress, MessageId,
        PusherChannel, SourceKind, ValueObjectError,
    },
    infrastructure::dto::websocket::{ClientMessage, ErrorCode, ServerMessage},
    ui::state::AppState,
    usecase::{DeleteChatError, StartStreamError},
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// 配信者トークン（視聴者は省略）
    pub token: Option<String>,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let authorized = match state
        .verify_token_usecase
        .authorize(query.token.as_deref())
    {
        Ok(authorized) => authorized,
        Err(e) => {
            tracing::warn!("Rejecting WebSocket upgrade: {}", e);
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    let connection_id = ConnectionIdFactory::generate();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, authorized)))
}

/// Waits for the next frame unless the connection is being torn down.
///
/// Only the wait is raced against `stop`; a frame already returned is handled to completion.
async fn next_unless_stopped<S>(
    stream: &mut S,
    stop: &mut watch::Receiver<bool>,
) -> Option<S::Item>
where
    S: Stream + Unpin,
{
    if *stop.borrow() {
        return None;
    }
    tokio::select! {
        // Err means the sender is gone, which also ends the loop
        _ = stop.changed() => None,
        item = stream.next() => item,
    }
}

/// Spawns a task that drains the connection's queue into the WebSocket sender.
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

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    authorized: bool,
) {
    let (sender, mut receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();

    // Errors are replied on the connection's own queue, behind anything already queued
    let reply_tx = tx.clone();

    if let Err(e) = state
        .connect_participant_usecase
        .execute(connection_id.clone(), authorized, tx)
        .await
    {
        tracing::warn!("Failed to register connection '{}': {}", connection_id, e);
        return;
    }
    tracing::info!(
        "Connection '{}' opened (authorized: {})",
        connection_id,
        authorized
    );

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = next_unless_stopped(&mut receiver, &mut stop_rx).await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id_clone, text);
                    if let Some(reply) =
                        handle_text(&state_clone, &connection_id_clone, text.as_str()).await
                    {
                        send_reply(&reply_tx, &reply);
                    }
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", connection_id_clone);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                // Ping/pong is handled by the WebSocket protocol
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // The writer is aborted outright. The reader is asked to stop between frames so a
    // use case it is dispatching is never cut off halfway.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            let _ = stop_tx.send(true);
            if let Err(e) = recv_task.await {
                tracing::warn!("Reader task for '{}' failed: {}", connection_id, e);
            }
        }
    };

    match state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
    {
        Some(outcome) => tracing::info!(
            "Connection '{}' closed (role: {:?}, stopped stream: {})",
            connection_id,
            outcome.participant.role,
            outcome.stopped_stream
        ),
        None => tracing::debug!("Connection '{}' was already reconciled", connection_id),
    }
}

fn send_reply(tx: &PusherChannel, reply: &ServerMessage) {
    match reply.to_json() {
        Ok(json) => {
            if tx.send(json).is_err() {
                tracing::debug!("Reply dropped: connection already closed");
            }
        }
        Err(e) => tracing::error!("Failed to encode reply: {}", e),
    }
}

fn invalid_payload(connection_id: &ConnectionId, err: ValueObjectError) -> Option<ServerMessage> {
    tracing::warn!("Invalid payload from '{}': {}", connection_id, err);
    Some(ServerMessage::error(ErrorCode::InvalidPayload, err.to_string()))
}

/// Handle one text frame. Returns the error reply for the sender, if any.
async fn handle_text(
    state: &AppState,
    connection_id: &ConnectionId,
    text: &str,
) -> Option<ServerMessage> {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Malformed frame from '{}': {}", connection_id, e);
            return Some(ServerMessage::error(ErrorCode::Malformed, e.to_string()));
        }
    };

    match message {
        ClientMessage::StartStream {
            media_address,
            source_kind,
        } => {
            let media_address = match MediaAddress::new(media_address) {
                Ok(address) => address,
                Err(e) => return invalid_payload(connection_id, e),
            };
            let source_kind = match source_kind.parse::<SourceKind>() {
                Ok(kind) => kind,
                Err(e) => return invalid_payload(connection_id, e),
            };
            match state
                .start_stream_usecase
                .execute(connection_id, media_address, source_kind)
                .await
            {
                Ok(()) => None,
                Err(StartStreamError::Unauthorized) => {
                    tracing::warn!("Unauthorized start-stream from '{}'", connection_id);
                    Some(ServerMessage::error(
                        ErrorCode::Unauthorized,
                        StartStreamError::Unauthorized.to_string(),
                    ))
                }
                Err(e) => {
                    tracing::warn!("start-stream from '{}' failed: {}", connection_id, e);
                    None
                }
            }
        }
        ClientMessage::StopStream => {
            state.stop_stream_usecase.execute(connection_id).await;
            None
        }
        ClientMessage::Join => {
            if let Err(e) = state.join_viewer_usecase.execute(connection_id).await {
                tracing::warn!("join from '{}' failed: {}", connection_id, e);
            }
            None
        }
        ClientMessage::Ready {
            viewer_media_address,
        } => {
            let viewer_media_address = match MediaAddress::new(viewer_media_address) {
                Ok(address) => address,
                Err(e) => return invalid_payload(connection_id, e),
            };
            state
                .viewer_ready_usecase
                .execute(connection_id, viewer_media_address)
                .await;
            None
        }
        ClientMessage::ChatPost { user, text } => {
            let user = match ChatUser::new(user) {
                Ok(user) => user,
                Err(e) => return invalid_payload(connection_id, e),
            };
            let text = match ChatText::new(text) {
                Ok(text) => text,
                Err(e) => return invalid_payload(connection_id, e),
            };
            state.post_chat_usecase.execute(user, text).await;
            None
        }
        ClientMessage::ChatDelete { message_id } => {
            match state
                .delete_chat_usecase
                .execute(connection_id, MessageId::new(message_id))
                .await
            {
                Ok(_) => None,
                Err(e @ DeleteChatError::Unauthorized) => {
                    tracing::warn!("Unauthorized chat-delete from '{}'", connection_id);
                    Some(ServerMessage::error(ErrorCode::Unauthorized, e.to_string()))
                }
            }
        }
    }
}

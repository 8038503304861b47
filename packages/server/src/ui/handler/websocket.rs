//! WebSocket connection handlers.

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
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, DisplayName, DomainError, Notification, RoomId},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that forwards queued frames from the pusher channel to the WebSocket sink.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    let client_id = state.connect_participant_usecase.execute(tx).await;

    let recv_state = state.clone();
    let recv_client_id = client_id.clone();

    // Messages from one connection are handled in arrival order
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error from '{}': {}", recv_client_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", recv_client_id, text.as_str());
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(message) => dispatch(&recv_state, &recv_client_id, message).await,
                        Err(e) => {
                            tracing::warn!("Dropping malformed message from '{}': {}", recv_client_id, e);
                        }
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_client_id);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    state
        .disconnect_participant_usecase
        .execute(&client_id)
        .await;
}

/// Route one inbound event to its use case.
///
/// Use case failures are already reported to the sender by the use case itself,
/// so they are only logged here.
async fn dispatch(state: &AppState, client_id: &ClientId, message: ClientMessage) {
    match message {
        ClientMessage::CreateRoom {
            room_id,
            display_name,
            ready,
        } => {
            let (room_id, display_name) =
                match (RoomId::try_from(room_id), DisplayName::try_from(display_name)) {
                    (Ok(room_id), Ok(display_name)) => (room_id, display_name),
                    (Err(e), _) | (_, Err(e)) => {
                        reject(state, client_id, e).await;
                        return;
                    }
                };
            if let Err(e) = state
                .create_room_usecase
                .execute(client_id, room_id, display_name, ready)
                .await
            {
                tracing::warn!("create_room from '{}' failed: {}", client_id, e);
            }
        }
        ClientMessage::JoinRoom { room_id } => {
            let Ok(room_id) = RoomId::try_from(room_id) else {
                // 不正な ID の Room は存在し得ない
                push(state, client_id, &Notification::room_not_found()).await;
                return;
            };
            if let Err(e) = state.join_room_usecase.execute(client_id, &room_id).await {
                tracing::warn!("join_room from '{}' failed: {}", client_id, e);
            }
        }
        ClientMessage::StartRoom { room_id, duration } => {
            let Some(room_id) = parse_room_id(room_id) else {
                return;
            };
            if let Err(e) = state
                .start_room_usecase
                .execute(client_id, &room_id, duration)
                .await
            {
                tracing::warn!("start_room from '{}' failed: {}", client_id, e);
            }
        }
        ClientMessage::EditCell {
            room_id,
            row,
            col,
            value,
        } => {
            let Some(room_id) = parse_room_id(room_id) else {
                return;
            };
            if let Err(e) = state
                .edit_cell_usecase
                .execute(client_id, &room_id, row, col, value)
                .await
            {
                tracing::debug!("edit_cell from '{}' failed: {}", client_id, e);
            }
        }
        ClientMessage::Submit {
            display_name,
            room_id,
        } => {
            let Some(room_id) = parse_room_id(room_id) else {
                return;
            };
            let display_name = match DisplayName::try_from(display_name) {
                Ok(display_name) => display_name,
                Err(e) => {
                    reject(state, client_id, e).await;
                    return;
                }
            };
            if let Err(e) = state
                .submit_usecase
                .execute(client_id, &room_id, display_name)
                .await
            {
                tracing::warn!("submit from '{}' failed: {}", client_id, e);
            }
        }
        ClientMessage::LeaveRoom { room_id } => {
            let room_id = match room_id {
                Some(room_id) => match parse_room_id(room_id) {
                    Some(room_id) => Some(room_id),
                    None => return,
                },
                None => None,
            };
            state.leave_room_usecase.execute(client_id, room_id).await;
        }
    }
}

/// ID として不正な Room 宛てのイベントは、存在しない Room 宛てと同じく捨てる
fn parse_room_id(room_id: String) -> Option<RoomId> {
    match RoomId::try_from(room_id) {
        Ok(room_id) => Some(room_id),
        Err(e) => {
            tracing::warn!("Dropping event for invalid room: {}", e);
            None
        }
    }
}

async fn reject(state: &AppState, client_id: &ClientId, error: DomainError) {
    tracing::info!("Rejected input from '{}': {}", client_id, error);
    push(
        state,
        client_id,
        &Notification::ActionRejected {
            message: error.to_string(),
        },
    )
    .await;
}

async fn push(state: &AppState, client_id: &ClientId, notification: &Notification) {
    if let Err(e) = state.message_pusher.push_to(client_id, notification).await {
        tracing::warn!("Failed to push to '{}': {}", client_id, e);
    }
}

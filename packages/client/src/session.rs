//! WebSocket client session management.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use masu_server::{
    domain::RoomIdFactory,
    infrastructure::dto::websocket::{ClientMessage, ServerMessage},
};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use crate::{
    command::{Command, parse_command},
    domain::{ClientState, Outcome},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// What the input loop should do with one command
#[derive(Debug, PartialEq)]
enum InputAction {
    Send(ClientMessage),
    Print(String),
    Quit,
}

fn handle_command(state: &mut ClientState, command: Command) -> InputAction {
    let result = match command {
        Command::Create(code) => {
            let code = match code {
                Some(code) => code,
                None => match RoomIdFactory::generate() {
                    Ok(id) => id.into_string(),
                    Err(e) => return InputAction::Print(MessageFormatter::format_local_error(&e)),
                },
            };
            state.request_create(&code)
        }
        Command::Join(code) => state.request_join(&code),
        Command::Start(duration) => state.request_start(duration),
        Command::Set { row, col, value } => state.try_edit(row, col, value),
        Command::Submit => state.try_submit(),
        Command::Leave => state.request_leave(),
        Command::Board => return InputAction::Print(MessageFormatter::format_status(state)),
        Command::Help => return InputAction::Print(MessageFormatter::format_help()),
        Command::Quit => return InputAction::Quit,
    };

    match result {
        Ok(message) => InputAction::Send(message),
        Err(e) => InputAction::Print(MessageFormatter::format_local_error(&e)),
    }
}

/// Run one WebSocket session until the user quits or the connection drops
///
/// `initial_room` is joined right after connecting. If it does not exist the session
/// ends with `ClientError::RoomNotFound`.
pub async fn run_client_session(
    url: &str,
    state: Arc<Mutex<ClientState>>,
    initial_room: Option<&str>,
) -> Result<(), ClientError> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    let display_name = state.lock().await.display_name.clone();
    tracing::info!("Connected to room server!");
    println!(
        "\nYou are '{}'. Type 'help' for commands. Press Ctrl+C to exit.\n",
        display_name
    );

    let (mut write, mut read) = ws_stream.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ClientMessage>();

    {
        let mut state = state.lock().await;
        if let Some(room) = initial_room {
            let join = state
                .request_join(room)
                .map_err(|_| ClientError::RoomNotFound(room.to_string()))?;
            outbound_tx.send(join).ok();
        } else if let Some(rejoin) = state.rejoin_message() {
            tracing::info!("Rejoining previous room");
            outbound_tx.send(rejoin).ok();
        }
    }
    let strict_join = initial_room.map(str::to_string);

    // Spawn a task to handle incoming messages
    let read_state = state.clone();
    let read_outbound = outbound_tx.clone();
    let read_name = display_name.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let message = match serde_json::from_str::<ServerMessage>(text.as_str()) {
                        Ok(message) => message,
                        Err(e) => {
                            tracing::warn!("Ignoring unknown message: {}", e);
                            continue;
                        }
                    };

                    let mut state = read_state.lock().await;
                    let previous_room = state.room_id.clone();
                    let outcome = state.apply_server_message(&message);

                    if let (ServerMessage::JoinError { .. }, Some(room)) = (&message, &strict_join)
                    {
                        return ClientError::RoomNotFound(room.clone());
                    }

                    if let Some(notice) = MessageFormatter::format_event(&message) {
                        print!("{}", notice);
                    }
                    match (&message, &outcome) {
                        (ServerMessage::TimerUpdate { remaining }, _) => {
                            if let Some(line) = MessageFormatter::format_timer(*remaining) {
                                print!("{}", line);
                            }
                        }
                        (ServerMessage::InitialBoard { .. }, _)
                        | (ServerMessage::BoardUpdate { .. }, _)
                        | (ServerMessage::AdminStarted { ready: false }, _)
                        | (ServerMessage::Winner { declared: true, .. }, _) => {
                            print!("{}", MessageFormatter::format_status(&state));
                        }
                        (ServerMessage::GameOver { .. }, Outcome::Evicted(_)) => {
                            if let Some(room_id) = previous_room {
                                read_outbound
                                    .send(ClientMessage::LeaveRoom {
                                        room_id: Some(room_id.into_string()),
                                    })
                                    .ok();
                            }
                        }
                        _ => {}
                    }
                    redisplay_prompt(&read_name);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
        ClientError::ConnectionError("Connection lost".to_string())
    });

    // Spawn a task that serialises outbound messages to the socket
    let mut write_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };
            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                return true;
            }
        }
        false
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt = format!("{}> ", display_name);
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task that turns typed commands into outbound messages
    let input_state = state.clone();
    let mut input_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(e) => {
                    print!("{}", MessageFormatter::format_local_error(&e));
                    continue;
                }
            };

            let mut state = input_state.lock().await;
            match handle_command(&mut state, command) {
                InputAction::Send(message) => {
                    let edited = matches!(message, ClientMessage::EditCell { .. });
                    if outbound_tx.send(message).is_err() {
                        break;
                    }
                    if edited {
                        print!("{}", MessageFormatter::format_status(&state));
                    }
                }
                InputAction::Print(text) => print!("{}", text),
                InputAction::Quit => {
                    if let Ok(leave) = state.request_leave() {
                        outbound_tx.send(leave).ok();
                    }
                    break;
                }
            }
        }
    });

    // If any one of the tasks completes, abort the others
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            input_task.abort();
            return Err(read_result
                .unwrap_or_else(|_| ClientError::ConnectionError("Connection lost".to_string())));
        }
        write_result = &mut write_task => {
            read_task.abort();
            input_task.abort();
            if write_result.unwrap_or(true) {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
        }
        _ = &mut input_task => {
            read_task.abort();
            // Let the farewell leave_room reach the server
            tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            write_task.abort();
        }
    }

    Ok(())
}

//! Client execution logic with reconnection support.

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use super::{
    domain::{ClientState, should_attempt_reconnect},
    error::ClientError,
    session::run_client_session,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the terminal client with reconnection logic.
///
/// After a reconnect the client joins the room it was in again.
pub async fn run_client(
    url: String,
    display_name: String,
    room: Option<String>,
) -> Result<(), ClientError> {
    let state = Arc::new(Mutex::new(ClientState::new(display_name.clone())));
    let mut initial_room = room;
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            display_name,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, state.clone(), initial_room.take().as_deref()).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                tracing::warn!("Session ended: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!("Giving up after {} attempt(s). Exiting.", reconnect_count);
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}

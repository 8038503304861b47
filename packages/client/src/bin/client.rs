//! Terminal client for the multiplayer Sudoku room server.
//!
//! Create or join a room, then fill in the shared board from the prompt.
//! Edits and submissions are checked locally before they are sent.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval)
//! and rejoins the room it was in.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin masu-client -- --name Alice
//! cargo run --bin masu-client -- -n Bob --room 1234
//! ```

use clap::Parser;

use masu_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "masu-client")]
#[command(about = "Terminal client for real-time multiplayer Sudoku", long_about = None)]
struct Args {
    /// Display name shown to the other players
    #[arg(short = 'n', long)]
    name: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Room code to join right after connecting
    #[arg(short = 'r', long)]
    room: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Run the client
    if let Err(e) = masu_client::run_client(args.url, args.name, args.room).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}

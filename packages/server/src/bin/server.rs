//! Multiplayer Sudoku room server.
//!
//! Clients create or join rooms over a WebSocket at `/ws`, edit a shared board and race
//! against a per-room countdown.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin masu-server
//! cargo run --bin masu-server -- --host 0.0.0.0 --port 3000 --verify-submissions
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use masu_server::{
    config::ServerConfig,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, puzzle::BacktrackingPuzzleGenerator,
        repository::InMemoryRoomRepository,
    },
    ui::{AppState, Server},
};
use masu_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "masu-server")]
#[command(about = "Real-time multiplayer Sudoku room server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Minimum number of cells cleared from a generated puzzle
    #[arg(long, default_value_t = 50)]
    min_removed: usize,

    /// Maximum number of cells cleared from a generated puzzle
    #[arg(long, default_value_t = 60)]
    max_removed: usize,

    /// Seconds an empty room may stay idle before it is removed
    #[arg(long, default_value_t = 600)]
    idle_timeout_secs: u64,

    /// Seconds between idle-room sweeps
    #[arg(long, default_value_t = 60)]
    sweep_interval_secs: u64,

    /// The countdown is cancelled when fewer participants than this remain
    #[arg(long, default_value_t = 2)]
    min_players: usize,

    /// Only declare a winner when the room board matches the solution
    #[arg(long)]
    verify_submissions: bool,
}

impl Args {
    fn config(&self) -> ServerConfig {
        let (low, high) = if self.min_removed <= self.max_removed {
            (self.min_removed, self.max_removed)
        } else {
            (self.max_removed, self.min_removed)
        };
        ServerConfig {
            removed_cells: low..=high,
            min_players: self.min_players,
            verify_submissions: self.verify_submissions,
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs.max(1)),
            ..ServerConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();
    let config = args.config();
    tracing::debug!("Server config: {:?}", config);

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. PuzzleGenerator
    // 4. AppState (UseCases)
    // 5. Background sweep and server

    // 1. Create Repository (in-memory database)
    let repository = Arc::new(InMemoryRoomRepository::new(Arc::new(SystemClock)));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create PuzzleGenerator
    let generator = Arc::new(BacktrackingPuzzleGenerator::new(config.removed_cells.clone()));

    // 4. Wire the use cases
    let state = Arc::new(AppState::new(&config, repository, message_pusher, generator));

    // 5. Start the idle-room sweep and run the server
    let sweeper = state
        .sweep_idle_rooms_usecase
        .clone()
        .spawn(config.sweep_interval);

    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        sweeper.abort();
        std::process::exit(1);
    }
    sweeper.abort();
}

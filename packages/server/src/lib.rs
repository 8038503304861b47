//! Real-time multiplayer Sudoku room server.
//!
//! Hosts generated puzzles in named rooms, keeps every participant's view of
//! the board in sync over WebSocket, and runs a shared countdown per room.

pub mod config;

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

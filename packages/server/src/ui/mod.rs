//! Room server front end: axum router, WebSocket and HTTP handlers.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;

//! Terminal client for the Masu room server.
//!
//! Renders the shared board, validates edits and submissions locally before they are sent,
//! and reconnects when the connection drops.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;

//! Utilities shared by the Masu server and client binaries.

pub mod logger;
pub mod time;

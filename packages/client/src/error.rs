//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The requested room does not exist on the server
    #[error("Room not found: {0}")]
    RoomNotFound(String),
}

/// Reasons an action is refused before anything is sent to the server
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalEditError {
    #[error("you are not in a room")]
    NotInRoom,

    #[error("'{0}' is not a valid room code")]
    InvalidRoomId(String),

    #[error("cell ({}, {}) is outside the board", .row + 1, .col + 1)]
    OutOfBounds { row: usize, col: usize },

    #[error("the game has not started yet")]
    GameNotStarted,

    #[error("the game is over")]
    GameOver,

    #[error("cell ({}, {}) is part of the puzzle", .row + 1, .col + 1)]
    FixedCellEdit { row: usize, col: usize },

    #[error("{} cannot go in cell ({}, {})", .value, .row + 1, .col + 1)]
    InvalidPlacement { row: usize, col: usize, value: u8 },

    #[error("fill in every cell before submitting")]
    IncompleteSubmission,

    #[error("only the room admin can start the game")]
    NotAdmin,
}

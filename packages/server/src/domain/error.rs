//! ドメイン層のエラー型

use thiserror::Error;

/// ドメインルール違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("invalid room id: {0:?}")]
    InvalidRoomId(String),

    #[error("invalid client id: {0:?}")]
    InvalidClientId(String),

    #[error("invalid display name: {0:?}")]
    InvalidDisplayName(String),

    #[error("cell ({row}, {col}) is outside the 9x9 board")]
    OutOfBounds { row: usize, col: usize },

    #[error("invalid digit {0} in grid")]
    InvalidDigit(u8),

    #[error("{value} cannot be placed at ({row}, {col})")]
    InvalidPlacement { row: usize, col: usize, value: u8 },

    #[error("cell ({row}, {col}) is fixed and cannot be changed")]
    FixedCellEdit { row: usize, col: usize },

    #[error("please fill all the cells before submitting")]
    IncompleteSubmission,

    #[error("the submitted board does not match the solution")]
    SubmissionMismatch,

    #[error("puzzle is not derived from its solution")]
    PuzzleMismatch,

    #[error("only the room admin can start the game")]
    NotAdmin,

    #[error("client is not a participant of this room")]
    NotParticipant,

    #[error("the game is not active")]
    GameNotActive,

    #[error("no countdown is running")]
    CountdownInactive,
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// メッセージ通知のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' is not registered")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

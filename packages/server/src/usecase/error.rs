//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{DomainError, RepositoryError};

/// Room 作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("room could not be created: {0}")]
    Rejected(DomainError),

    #[error(transparent)]
    Join(#[from] JoinRoomError),
}

impl From<RepositoryError> for CreateRoomError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(id) => Self::Join(JoinRoomError::RoomNotFound(id)),
            RepositoryError::Domain(e) => Self::Rejected(e),
        }
    }
}

/// Room 参加のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    #[error("join rejected: {0}")]
    Rejected(DomainError),
}

impl From<RepositoryError> for JoinRoomError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(id) => Self::RoomNotFound(id),
            RepositoryError::Domain(e) => Self::Rejected(e),
        }
    }
}

/// ゲーム開始（ready 切り替え）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartRoomError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    #[error("start rejected: {0}")]
    Rejected(DomainError),
}

impl From<RepositoryError> for StartRoomError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(id) => Self::RoomNotFound(id),
            RepositoryError::Domain(e) => Self::Rejected(e),
        }
    }
}

/// セル編集のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditCellError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    #[error("edit rejected: {0}")]
    Rejected(DomainError),
}

impl From<RepositoryError> for EditCellError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(id) => Self::RoomNotFound(id),
            RepositoryError::Domain(e) => Self::Rejected(e),
        }
    }
}

/// 提出のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    #[error("submission rejected: {0}")]
    Rejected(DomainError),
}

impl From<RepositoryError> for SubmitError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(id) => Self::RoomNotFound(id),
            RepositoryError::Domain(e) => Self::Rejected(e),
        }
    }
}

/// Room 詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("room not found")]
    RoomNotFound,
}

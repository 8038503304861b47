//! Domain logic for client-side operations.
//!
//! `ClientState` is the local view of one room session. It mirrors the server's events and
//! performs the checks that must happen before an edit or a submission leaves the client.
//! Everything here is free of I/O so it can be tested directly.

use masu_server::{
    domain::{Grid, RoomId, grid::GRID_SIZE, is_valid_placement},
    infrastructure::dto::websocket::{ClientMessage, GridDto, ServerMessage},
};

use crate::error::{ClientError, LocalEditError};

/// Countdown length used when `start` is given without a duration
pub const DEFAULT_DURATION_SECS: u32 = 300;

/// What the session should do after a server event has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Stay in the current room
    Stay,
    /// The room session is over; the view has been reset
    Evicted(String),
}

/// An edit applied to the local board that the server has not confirmed yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEdit {
    pub row: usize,
    pub col: usize,
    /// Value the cell held before the edit
    pub previous: u8,
    pub value: u8,
}

/// Local view of the current room
#[derive(Debug, Clone, PartialEq)]
pub struct ClientState {
    pub display_name: String,
    pub room_id: Option<RoomId>,
    /// Set when this client asked to create the room it is in
    pub created_room: bool,
    pub admin_name: Option<String>,
    /// Mirrors the admin's toggle. `false` means the game is running
    pub ready: bool,
    pub puzzle: Option<Grid>,
    pub board: Option<Grid>,
    pub user_count: usize,
    pub remaining: Option<u32>,
    pub winner: Option<String>,
    pub solution: Option<Grid>,
    /// Set once a winner has been declared. The server keeps the room ended even if the
    /// claim is withdrawn, so only a new start clears it
    pub ended: bool,
    /// Most recent local edit, rolled back if the server rejects it
    pub last_edit: Option<PendingEdit>,
}

impl ClientState {
    pub fn new(display_name: String) -> Self {
        Self {
            display_name,
            room_id: None,
            created_room: false,
            admin_name: None,
            ready: true,
            puzzle: None,
            board: None,
            user_count: 0,
            remaining: None,
            winner: None,
            solution: None,
            ended: false,
            last_edit: None,
        }
    }

    /// The server decides who the admin is; this only mirrors it for the view
    pub fn is_admin(&self) -> bool {
        self.created_room && self.admin_name.as_deref() == Some(self.display_name.as_str())
    }

    pub fn in_room(&self) -> bool {
        self.room_id.is_some()
    }

    /// Non-admins see and edit the board only once the game has started
    pub fn board_visible(&self) -> bool {
        self.board.is_some() && (self.is_admin() || !self.ready)
    }

    fn leave_room(&mut self) {
        *self = Self::new(std::mem::take(&mut self.display_name));
    }

    fn room(&self) -> Result<&RoomId, LocalEditError> {
        self.room_id.as_ref().ok_or(LocalEditError::NotInRoom)
    }

    /// Create (or join, if it already exists) a room
    pub fn request_create(&mut self, room_id: &str) -> Result<ClientMessage, LocalEditError> {
        let room_id = parse_room_id(room_id)?;
        self.leave_room();
        self.room_id = Some(room_id.clone());
        self.created_room = true;
        Ok(ClientMessage::CreateRoom {
            room_id: room_id.into_string(),
            display_name: self.display_name.clone(),
            ready: true,
        })
    }

    pub fn request_join(&mut self, room_id: &str) -> Result<ClientMessage, LocalEditError> {
        let room_id = parse_room_id(room_id)?;
        self.leave_room();
        self.room_id = Some(room_id.clone());
        Ok(ClientMessage::JoinRoom {
            room_id: room_id.into_string(),
        })
    }

    /// Toggle the room's ready flag. Starting the countdown is admin-only
    pub fn request_start(&self, duration: u32) -> Result<ClientMessage, LocalEditError> {
        let room_id = self.room()?;
        if !self.is_admin() {
            return Err(LocalEditError::NotAdmin);
        }
        Ok(ClientMessage::StartRoom {
            room_id: room_id.as_str().to_string(),
            duration,
        })
    }

    /// Validate an edit, apply it to the local board and build the message for the server.
    ///
    /// `value` 0 clears the cell. The server answers with the recorded board, or with
    /// `edit_rejected` followed by the recorded board.
    pub fn try_edit(
        &mut self,
        row: usize,
        col: usize,
        value: u8,
    ) -> Result<ClientMessage, LocalEditError> {
        let room_id = self.room()?.as_str().to_string();
        let (Some(puzzle), Some(board)) = (self.puzzle, self.board) else {
            return Err(LocalEditError::NotInRoom);
        };
        if self.ended {
            return Err(LocalEditError::GameOver);
        }
        if self.ready && !self.is_admin() {
            return Err(LocalEditError::GameNotStarted);
        }
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return Err(LocalEditError::OutOfBounds { row, col });
        }
        if puzzle.is_given(row, col) {
            return Err(LocalEditError::FixedCellEdit { row, col });
        }
        if !is_valid_placement(&board, row, col, value) {
            return Err(LocalEditError::InvalidPlacement { row, col, value });
        }

        let mut rows = board.into_rows();
        let previous = rows[row][col];
        rows[row][col] = value;
        let updated = Grid::from_rows(rows)
            .map_err(|_| LocalEditError::InvalidPlacement { row, col, value })?;
        self.board = Some(updated);
        self.last_edit = Some(PendingEdit {
            row,
            col,
            previous,
            value,
        });

        Ok(ClientMessage::EditCell {
            room_id,
            row,
            col,
            value,
        })
    }

    /// Submissions with empty cells never leave the client
    pub fn try_submit(&self) -> Result<ClientMessage, LocalEditError> {
        let room_id = self.room()?;
        let board = self.board.as_ref().ok_or(LocalEditError::NotInRoom)?;
        if !board.is_complete() {
            return Err(LocalEditError::IncompleteSubmission);
        }
        Ok(ClientMessage::Submit {
            display_name: self.display_name.clone(),
            room_id: room_id.as_str().to_string(),
        })
    }

    /// After a reconnect the server knows nothing about this client; ask to join the same room
    /// again. Admin rights belong to the old connection and are not carried over.
    pub fn rejoin_message(&mut self) -> Option<ClientMessage> {
        let room_id = self.room_id.clone()?;
        self.leave_room();
        self.room_id = Some(room_id.clone());
        Some(ClientMessage::JoinRoom {
            room_id: room_id.into_string(),
        })
    }

    /// Leave the current room and reset the view
    pub fn request_leave(&mut self) -> Result<ClientMessage, LocalEditError> {
        let room_id = self.room()?.as_str().to_string();
        self.leave_room();
        Ok(ClientMessage::LeaveRoom {
            room_id: Some(room_id),
        })
    }

    /// Apply one server event to the view.
    ///
    /// Events that carry an invalid grid are ignored.
    pub fn apply_server_message(&mut self, message: &ServerMessage) -> Outcome {
        match message {
            ServerMessage::InitialBoard { grid } => {
                if let Some(grid) = to_grid(grid) {
                    self.puzzle = Some(grid);
                    self.board = Some(grid);
                }
            }
            ServerMessage::BoardUpdate { grid } => {
                if let Some(grid) = to_grid(grid) {
                    self.board = Some(grid);
                }
            }
            ServerMessage::Admin { display_name } => {
                self.admin_name = Some(display_name.clone());
            }
            ServerMessage::UserCountUpdate { count } => self.user_count = *count,
            ServerMessage::AdminStarted { ready } => {
                self.ready = *ready;
                if !*ready {
                    self.winner = None;
                    self.solution = None;
                    self.ended = false;
                } else {
                    self.remaining = None;
                }
            }
            ServerMessage::TimerUpdate { remaining } => self.remaining = Some(*remaining),
            ServerMessage::GameOver { message, .. } => {
                let message = message.clone();
                self.leave_room();
                return Outcome::Evicted(message);
            }
            ServerMessage::Winner {
                display_name,
                declared,
                solution,
            } => {
                if *declared {
                    self.winner = Some(display_name.clone());
                    self.solution = to_grid(solution);
                    self.remaining = None;
                    self.ended = true;
                } else {
                    self.winner = None;
                    self.solution = None;
                }
            }
            ServerMessage::JoinError { message } => {
                let message = message.clone();
                self.leave_room();
                return Outcome::Evicted(message);
            }
            ServerMessage::EditRejected { .. } => self.roll_back_last_edit(),
            ServerMessage::ActionRejected { .. } => {}
        }
        Outcome::Stay
    }

    /// Undo the latest local edit unless a board update has already replaced that cell
    fn roll_back_last_edit(&mut self) {
        let (Some(edit), Some(board)) = (self.last_edit.take(), self.board) else {
            return;
        };
        if board.get(edit.row, edit.col) != Some(edit.value) {
            return;
        }
        let mut rows = board.into_rows();
        rows[edit.row][edit.col] = edit.previous;
        if let Ok(restored) = Grid::from_rows(rows) {
            self.board = Some(restored);
        }
    }
}

fn parse_room_id(room_id: &str) -> Result<RoomId, LocalEditError> {
    RoomId::new(room_id.to_string()).map_err(|_| LocalEditError::InvalidRoomId(room_id.to_string()))
}

fn to_grid(grid: &GridDto) -> Option<Grid> {
    match Grid::from_rows(*grid) {
        Ok(grid) => Some(grid),
        Err(e) => {
            tracing::warn!("Ignoring invalid grid from server: {}", e);
            None
        }
    }
}

/// Check if the client should exit immediately based on the error type.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(error, ClientError::RoomNotFound(_))
}

/// Check if the client should attempt to reconnect.
///
/// `current_attempt` is 0-indexed.
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

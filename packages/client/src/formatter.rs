//! Message formatting utilities for client display.

use masu_server::{domain::Grid, infrastructure::dto::websocket::ServerMessage};

use crate::domain::ClientState;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Render a board. Givens are shown in brackets, empty cells as dots.
    pub fn format_board(puzzle: &Grid, board: &Grid) -> String {
        let mut output = String::from("\n      1  2  3   4  5  6   7  8  9\n");
        for row in 0..9 {
            if row % 3 == 0 {
                output.push_str("    +---------+---------+---------+\n");
            }
            output.push_str(&format!("  {} |", row + 1));
            for col in 0..9 {
                let cell = match board.get(row, col) {
                    Some(0) | None => " . ".to_string(),
                    Some(v) if puzzle.is_given(row, col) => format!("[{}]", v),
                    Some(v) => format!(" {} ", v),
                };
                output.push_str(&cell);
                if col % 3 == 2 {
                    output.push('|');
                }
            }
            output.push('\n');
        }
        output.push_str("    +---------+---------+---------+\n");
        output
    }

    /// Remaining seconds as `mm:ss`
    pub fn format_remaining(remaining: u32) -> String {
        format!("{:02}:{:02}", remaining / 60, remaining % 60)
    }

    /// Status block for the current room
    pub fn format_status(state: &ClientState) -> String {
        let Some(room_id) = &state.room_id else {
            return "\nNot in a room. Type 'create' or 'join <code>'.\n".to_string();
        };

        let mut output = format!("\n{}\n", RULE);
        output.push_str(&format!("Room {}", room_id));
        if let Some(admin) = &state.admin_name {
            output.push_str(&format!(" | admin: {}", admin));
        }
        output.push_str(&format!(" | players: {}", state.user_count));
        if let Some(remaining) = state.remaining {
            output.push_str(&format!(" | {}", Self::format_remaining(remaining)));
        }
        output.push('\n');

        match (&state.puzzle, &state.board) {
            (Some(puzzle), Some(board)) if state.board_visible() => {
                output.push_str(&Self::format_board(puzzle, board));
            }
            _ if state.is_admin() => {
                output.push_str("Waiting for the puzzle...\n");
            }
            _ => output.push_str("Waiting for the admin to start the game...\n"),
        }

        if let (Some(winner), Some(solution)) = (&state.winner, &state.solution) {
            output.push_str(&format!("\n{} declared victory. Solution:\n", winner));
            output.push_str(&Self::format_board(solution, solution));
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// One-line notice for events that do not redraw the board
    pub fn format_event(message: &ServerMessage) -> Option<String> {
        match message {
            ServerMessage::UserCountUpdate { count } => {
                Some(format!("\n* {} player(s) in the room\n", count))
            }
            ServerMessage::AdminStarted { ready: false } => {
                Some("\n* The game has started!\n".to_string())
            }
            ServerMessage::AdminStarted { ready: true } => {
                Some("\n* The admin paused the game\n".to_string())
            }
            ServerMessage::Winner {
                display_name,
                declared: false,
                ..
            } => Some(format!("\n* {} withdrew the victory claim\n", display_name)),
            ServerMessage::GameOver { message, .. } => Some(format!("\n* Game over: {}\n", message)),
            ServerMessage::JoinError { message } => Some(format!("\n! {}\n", message)),
            ServerMessage::EditRejected { message } => {
                Some(format!("\n! Edit rejected: {}\n", message))
            }
            ServerMessage::ActionRejected { message } => {
                Some(format!("\n! Rejected: {}\n", message))
            }
            _ => None,
        }
    }

    /// Timer line, printed only on round values to keep the terminal readable
    pub fn format_timer(remaining: u32) -> Option<String> {
        if remaining <= 10 || remaining % 30 == 0 {
            Some(format!("\n* {} left\n", Self::format_remaining(remaining)))
        } else {
            None
        }
    }

    pub fn format_local_error(error: &impl std::fmt::Display) -> String {
        format!("! {}\n", error)
    }

    pub fn format_help() -> String {
        [
            "Commands:",
            "  create [code]          create a room (or join it if it exists)",
            "  join <code>            join an existing room",
            "  start [seconds]        admin: start or pause the game (default 300s)",
            "  set <row> <col> <n>    write n (1-9) into a cell",
            "  clear <row> <col>      empty a cell",
            "  submit                 claim victory once the board is full",
            "  board                  show the room and board",
            "  leave                  leave the room",
            "  quit                   exit",
            "",
        ]
        .join("\n")
    }
}

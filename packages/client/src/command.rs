//! Parsing of the commands typed at the prompt.
//!
//! Rows and columns are 1-based at the prompt and 0-based everywhere else.

use thiserror::Error;

use crate::domain::DEFAULT_DURATION_SECS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a room; a code is generated when none is given
    Create(Option<String>),
    Join(String),
    Start(u32),
    Set { row: usize, col: usize, value: u8 },
    Submit,
    Leave,
    Board,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for the list")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

const SET_USAGE: &str = "set <row 1-9> <col 1-9> <value 1-9>";
const CLEAR_USAGE: &str = "clear <row 1-9> <col 1-9>";

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err(CommandError::Usage("help"));
    };
    let args: Vec<&str> = words.collect();

    match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("create" | "c", []) => Ok(Command::Create(None)),
        ("create" | "c", [room_id]) => Ok(Command::Create(Some(room_id.to_string()))),
        ("create" | "c", _) => Err(CommandError::Usage("create [room code]")),
        ("join" | "j", [room_id]) => Ok(Command::Join(room_id.to_string())),
        ("join" | "j", _) => Err(CommandError::Usage("join <room code>")),
        ("start", []) => Ok(Command::Start(DEFAULT_DURATION_SECS)),
        ("start", [seconds]) => seconds
            .parse()
            .map(Command::Start)
            .map_err(|_| CommandError::Usage("start [seconds]")),
        ("start", _) => Err(CommandError::Usage("start [seconds]")),
        ("set" | "s", [row, col, value]) => {
            let (row, col) = parse_cell(row, col).ok_or(CommandError::Usage(SET_USAGE))?;
            let value = value
                .parse::<u8>()
                .ok()
                .filter(|v| (1..=9).contains(v))
                .ok_or(CommandError::Usage(SET_USAGE))?;
            Ok(Command::Set { row, col, value })
        }
        ("set" | "s", _) => Err(CommandError::Usage(SET_USAGE)),
        ("clear", [row, col]) => {
            let (row, col) = parse_cell(row, col).ok_or(CommandError::Usage(CLEAR_USAGE))?;
            Ok(Command::Set { row, col, value: 0 })
        }
        ("clear", _) => Err(CommandError::Usage(CLEAR_USAGE)),
        ("submit", []) => Ok(Command::Submit),
        ("leave", []) => Ok(Command::Leave),
        ("board" | "b", []) => Ok(Command::Board),
        ("help" | "h" | "?", _) => Ok(Command::Help),
        ("quit" | "exit" | "q", _) => Ok(Command::Quit),
        (other, _) => Err(CommandError::Unknown(other.to_string())),
    }
}

/// 1-based row and column to 0-based indices
fn parse_cell(row: &str, col: &str) -> Option<(usize, usize)> {
    let index = |s: &str| {
        s.parse::<usize>()
            .ok()
            .filter(|n| (1..=9).contains(n))
            .map(|n| n - 1)
    };
    Some((index(row)?, index(col)?))
}

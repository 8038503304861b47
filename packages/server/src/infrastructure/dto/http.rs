//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Entry of `GET /api/rooms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub participant_count: usize,
    pub phase: String,
    pub admin: String,
    pub created_at: String,
    pub last_activity: String,
}

/// Participant entry of `GET /api/rooms/{room_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub client_id: String,
    pub joined_at: String,
}

/// Response of `GET /api/rooms/{room_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub phase: String,
    pub admin: String,
    pub ready: bool,
    pub countdown_remaining: Option<u32>,
    pub winner_declared: bool,
    pub empty_cells: usize,
    pub participants: Vec<ParticipantDetailDto>,
    pub created_at: String,
    pub last_activity: String,
}

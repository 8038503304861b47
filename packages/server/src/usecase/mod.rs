//! UseCase 層
//!
//! プロトコルの各操作（作成・参加・開始・編集・提出・退出・切断）を 1 つずつ
//! ユースケースとして実装する。Repository と MessagePusher は trait として注入される。

mod connect_participant;
mod create_room;
mod disconnect_participant;
mod edit_cell;
mod error;
mod get_room_detail;
mod get_rooms;
mod join_room;
mod leave_room;
mod start_room;
mod submit;
mod sweep_idle_rooms;
mod timer;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_participant::ConnectParticipantUseCase;
pub use create_room::CreateRoomUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use edit_cell::EditCellUseCase;
pub use error::{
    CreateRoomError, EditCellError, GetRoomDetailError, JoinRoomError, StartRoomError,
    SubmitError,
};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use start_room::StartRoomUseCase;
pub use submit::SubmitUseCase;
pub use sweep_idle_rooms::SweepIdleRoomsUseCase;
pub use timer::TimerService;

//! Shared application state.

use std::sync::Arc;

use crate::{
    config::ServerConfig,
    domain::{MessagePusher, PuzzleGenerator, RoomRepository},
    usecase::{
        ConnectParticipantUseCase, CreateRoomUseCase, DisconnectParticipantUseCase,
        EditCellUseCase, GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase,
        LeaveRoomUseCase, StartRoomUseCase, SubmitUseCase, SweepIdleRoomsUseCase, TimerService,
    },
};

/// Shared application state
pub struct AppState {
    /// MessagePusher（入力エラーなどの返信に使う）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    pub start_room_usecase: Arc<StartRoomUseCase>,
    pub edit_cell_usecase: Arc<EditCellUseCase>,
    pub submit_usecase: Arc<SubmitUseCase>,
    pub leave_room_usecase: Arc<LeaveRoomUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    pub sweep_idle_rooms_usecase: Arc<SweepIdleRoomsUseCase>,
}

impl AppState {
    /// Wire every use case on top of the given repository, pusher and puzzle generator.
    pub fn new(
        config: &ServerConfig,
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        puzzle_generator: Arc<dyn PuzzleGenerator>,
    ) -> Self {
        // 1. Countdown timer shared by start / submit / leave / sweep
        let timer = Arc::new(TimerService::new(
            repository.clone(),
            message_pusher.clone(),
            config.tick_period,
        ));

        // 2. Room membership
        let join_room_usecase = Arc::new(JoinRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        ));
        let leave_room_usecase = Arc::new(LeaveRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            timer.clone(),
            config.min_players,
        ));

        // 3. Game actions
        let create_room_usecase = Arc::new(CreateRoomUseCase::new(
            repository.clone(),
            puzzle_generator,
            join_room_usecase.clone(),
        ));
        let start_room_usecase = Arc::new(StartRoomUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            timer.clone(),
        ));
        let edit_cell_usecase = Arc::new(EditCellUseCase::new(
            repository.clone(),
            message_pusher.clone(),
        ));
        let submit_usecase = Arc::new(SubmitUseCase::new(
            repository.clone(),
            message_pusher.clone(),
            timer.clone(),
            config.verify_submissions,
        ));

        // 4. Connection lifecycle
        let connect_participant_usecase =
            Arc::new(ConnectParticipantUseCase::new(message_pusher.clone()));
        let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
            message_pusher.clone(),
            leave_room_usecase.clone(),
        ));

        // 5. Queries and housekeeping
        let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(repository.clone()));
        let get_room_detail_usecase = Arc::new(GetRoomDetailUseCase::new(repository.clone()));
        let sweep_idle_rooms_usecase = Arc::new(SweepIdleRoomsUseCase::new(
            repository,
            timer.clone(),
            config.idle_timeout,
        ));

        Self {
            message_pusher,
            connect_participant_usecase,
            disconnect_participant_usecase,
            create_room_usecase,
            join_room_usecase,
            start_room_usecase,
            edit_cell_usecase,
            submit_usecase,
            leave_room_usecase,
            get_rooms_usecase,
            get_room_detail_usecase,
            sweep_idle_rooms_usecase,
        }
    }
}

//! UseCase: Room の作成
//!
//! 存在しなければパズルを生成して Room を作り、作成者を admin として参加させる。
//! 既に存在する場合は作り直さずに参加だけ行う。
//!
//! パズル生成は Repository のロックの外で行い、ロックの中では Room を組み立てて
//! 登録するだけにする。

use std::sync::Arc;

use crate::domain::{
    ClientId, DisplayName, GeneratedPuzzle, PuzzleGenerator, Room, RoomId, RoomRepository,
};

use super::{error::CreateRoomError, join_room::JoinRoomUseCase};

/// Room 作成のユースケース
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    puzzle_generator: Arc<dyn PuzzleGenerator>,
    join_room: Arc<JoinRoomUseCase>,
}

impl CreateRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        puzzle_generator: Arc<dyn PuzzleGenerator>,
        join_room: Arc<JoinRoomUseCase>,
    ) -> Self {
        Self {
            repository,
            puzzle_generator,
            join_room,
        }
    }

    /// Room を作成（または既存の Room に参加）する
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - 新しく作成した
    /// * `Ok(false)` - 既に存在していたので参加だけ行った
    pub async fn execute(
        &self,
        client_id: &ClientId,
        room_id: RoomId,
        display_name: DisplayName,
        ready: bool,
    ) -> Result<bool, CreateRoomError> {
        let created = match self.repository.get_room(&room_id).await {
            Ok(_) => false,
            Err(_) => {
                let GeneratedPuzzle { puzzle, solution } = self.puzzle_generator.generate();
                let admin = client_id.clone();
                let id = room_id.clone();
                // 生成中に同じ ID の Room が作られていれば、そちらが優先される
                let (_, created) = self
                    .repository
                    .create_if_absent(
                        room_id.clone(),
                        Box::new(move |now| {
                            Room::new(id, puzzle, solution, admin, display_name, ready, now)
                        }),
                    )
                    .await?;
                created
            }
        };

        if created {
            tracing::info!("Room '{}' created by '{}'", room_id, client_id);
        } else {
            tracing::debug!("Room '{}' already exists, joining instead", room_id);
        }

        self.join_room.execute(client_id, &room_id).await?;
        Ok(created)
    }
}

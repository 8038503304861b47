//! UseCase: Room 一覧の取得

use std::sync::Arc;

use crate::domain::{Room, RoomRepository};

pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 全ての Room を ID 順で返す
    pub async fn execute(&self) -> Vec<Room> {
        self.repository.list_rooms().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Harness, room_id, seed_room};

    #[tokio::test]
    async fn test_get_rooms_returns_existing_rooms() {
        // テスト項目: 作成済みの Room が一覧に含まれる
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _alice_rx) = harness.connect("alice").await;
        seed_room(&harness, &alice, &[&alice]).await;
        let usecase = GetRoomsUseCase::new(harness.repository.clone());

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id, room_id("1234"));
    }
}

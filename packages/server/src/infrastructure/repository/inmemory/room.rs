//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `HashMap` をインメモリ DB として使用します。
//!
//! 全ての Room を 1 つの非同期 Mutex で保護するため、1 回の呼び出しの中で行う
//! 変更は他のハンドラやタイマーの tick と交互に実行されることがない。
//! このロックはクロージャの実行中だけ保持するので、パズル生成のような重い処理は
//! 呼び出す前に済ませておく。
//!
//! 変更と通知をまとめて直列化するための Room 単位のロックは別に持つ。
//! Room ID は 4 桁の数字なので、ロックの数は高々 9000 個に収まる。
//! プロセスを再起動すると全ての Room は失われる。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use masu_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ClientId, RepositoryError, Room, RoomFactory, RoomGuard, RoomId, RoomMutation,
    RoomPredicate, RoomRepository, Timestamp,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    rooms: Mutex<HashMap<RoomId, Room>>,
    /// Room 単位のロック（`lock_room` 用）
    room_locks: Mutex<HashMap<RoomId, Arc<Mutex<()>>>>,
    /// 作成時刻・最終アクティビティの記録に使う時計
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            room_locks: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }

    /// Room 全体のロックが取られているか
    #[cfg(test)]
    pub(crate) fn is_store_locked(&self) -> bool {
        self.rooms.try_lock().is_err()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let rooms = self.rooms.lock().await;
        let mut list: Vec<Room> = rooms.values().cloned().collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    async fn create_if_absent(
        &self,
        room_id: RoomId,
        factory: RoomFactory,
    ) -> Result<(Room, bool), RepositoryError> {
        let now = self.now();
        let mut rooms = self.rooms.lock().await;
        if let Some(room) = rooms.get(&room_id) {
            return Ok((room.clone(), false));
        }

        let room = factory(now)?;
        rooms.insert(room_id.clone(), room.clone());
        tracing::debug!("Room '{}' stored", room_id);
        Ok((room, true))
    }

    async fn update_room(
        &self,
        room_id: &RoomId,
        mutation: RoomMutation,
    ) -> Result<Room, RepositoryError> {
        let now = self.now();
        let mut rooms = self.rooms.lock().await;
        let stored = rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))?;

        // 変更はコピーに対して行い、成功した場合だけ反映する
        let mut draft = stored.clone();
        mutation(&mut draft, now)?;
        draft.touch(now);
        *stored = draft;
        Ok(stored.clone())
    }

    async fn remove_room(&self, room_id: &RoomId) -> Option<Room> {
        let mut rooms = self.rooms.lock().await;
        rooms.remove(room_id)
    }

    async fn remove_rooms_where(&self, predicate: RoomPredicate) -> Vec<Room> {
        let now = self.now();
        let mut rooms = self.rooms.lock().await;
        let targets: Vec<RoomId> = rooms
            .values()
            .filter(|room| predicate(room, now))
            .map(|room| room.id.clone())
            .collect();
        targets
            .iter()
            .filter_map(|room_id| rooms.remove(room_id))
            .collect()
    }

    async fn rooms_of(&self, client_id: &ClientId) -> Vec<RoomId> {
        let rooms = self.rooms.lock().await;
        let mut ids: Vec<RoomId> = rooms
            .values()
            .filter(|room| room.contains(client_id))
            .map(|room| room.id.clone())
            .collect();
        ids.sort();
        ids
    }

    async fn lock_room(&self, room_id: &RoomId) -> RoomGuard {
        let lock = {
            let mut locks = self.room_locks.lock().await;
            locks.entry(room_id.clone()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

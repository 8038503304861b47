//! UseCase: 放置された Room の掃除
//!
//! 参加者がいなくなってから一定時間が経った Room を削除し、タイマーも止める。

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::domain::{RoomId, RoomRepository};

use super::timer::TimerService;

pub struct SweepIdleRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    timer: Arc<TimerService>,
    idle_timeout: Duration,
}

impl SweepIdleRoomsUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        timer: Arc<TimerService>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            timer,
            idle_timeout,
        }
    }

    /// 放置された Room を削除し、その ID を返す
    pub async fn execute(&self) -> Vec<RoomId> {
        let timeout_millis = i64::try_from(self.idle_timeout.as_millis()).unwrap_or(i64::MAX);
        let removed = self
            .repository
            .remove_rooms_where(Box::new(move |room, now| room.is_idle(now, timeout_millis)))
            .await;

        let mut ids = Vec::with_capacity(removed.len());
        for room in removed {
            self.timer.stop(&room.id).await;
            tracing::info!("Removed idle room '{}'", room.id);
            ids.push(room.id);
        }
        ids
    }

    /// `interval` ごとに掃除するタスクを起動する
    pub fn spawn(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // 最初の tick は即座に完了する
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = self.execute().await;
                if !removed.is_empty() {
                    tracing::debug!("Idle sweep removed {} rooms", removed.len());
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Harness, room_id, seed_room};

    fn create_usecase(harness: &Harness) -> SweepIdleRoomsUseCase {
        let timer = Arc::new(TimerService::new(
            harness.repository.clone(),
            harness.pusher.clone(),
            Duration::from_secs(1),
        ));
        SweepIdleRoomsUseCase::new(harness.repository.clone(), timer, Duration::from_secs(600))
    }

    #[tokio::test]
    async fn test_sweep_removes_only_empty_idle_rooms() {
        // テスト項目: 参加者がいない Room だけが、タイムアウト経過後に削除される
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _alice_rx) = harness.connect("alice").await;
        seed_room(&harness, &alice, &[]).await;
        let usecase = create_usecase(&harness);

        // when (操作):
        harness.clock.advance(599_000);
        let early = usecase.execute().await;
        harness.clock.advance(1_000);
        let removed = usecase.execute().await;

        // then (期待する結果):
        assert!(early.is_empty());
        assert_eq!(removed, vec![room_id("1234")]);
        assert!(harness.repository.list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_keeps_occupied_rooms() {
        // テスト項目: 参加者がいる Room は時間が経っても削除されない
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _alice_rx) = harness.connect("alice").await;
        seed_room(&harness, &alice, &[&alice]).await;
        let usecase = create_usecase(&harness);

        // when (操作):
        harness.clock.advance(3_600_000);
        let removed = usecase.execute().await;

        // then (期待する結果):
        assert!(removed.is_empty());
        assert_eq!(harness.repository.list_rooms().await.len(), 1);
    }
}

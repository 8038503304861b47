//! カウントダウンタイマー
//!
//! Room ごとに高々 1 つのタスクを動かし、`tick_period` ごとに残り秒数を 1 減らして
//! `timer_update` を配信する。0 に達したら `game_over` を 1 度だけ配信して終了する。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - start / stop / 自然終了のライフサイクル
//! - 残り秒数が単調減少すること、`game_over` が 1 度だけ届くこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：0 までカウントダウンして終了
//! - 再開始：古いタスクが止まり、新しいタスクだけが動く
//! - 停止：stop 後は何も配信されない
//! - エッジケース：duration 0、Room 削除後のタスク

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{Instant, interval_at},
};

use crate::domain::{MessagePusher, Notification, RoomId, RoomRepository};

struct CountdownTask {
    generation: u64,
    handle: JoinHandle<()>,
}

type CountdownTable = Arc<Mutex<HashMap<RoomId, CountdownTask>>>;

/// Room ごとのカウントダウンタスクを管理する
pub struct TimerService {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    tick_period: Duration,
    countdowns: CountdownTable,
    next_generation: AtomicU64,
}

impl TimerService {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        tick_period: Duration,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            tick_period,
            countdowns: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    /// カウントダウンを開始する。
    ///
    /// 残り秒数は Room の `countdown` に既にセットされている前提。
    /// 同じ Room のタスクが動いていれば中止して置き換える。
    pub async fn start(&self, room_id: RoomId) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let mut countdowns = self.countdowns.lock().await;

        let handle = tokio::spawn(run_countdown(
            room_id.clone(),
            generation,
            self.repository.clone(),
            self.message_pusher.clone(),
            self.countdowns.clone(),
            self.tick_period,
        ));

        if let Some(previous) = countdowns.insert(room_id.clone(), CountdownTask { generation, handle })
        {
            previous.handle.abort();
            tracing::debug!("Replaced running countdown for room '{}'", room_id);
        }
        tracing::info!("Countdown started for room '{}'", room_id);
    }

    /// カウントダウンを中止する。動いていなければ何もしない。
    ///
    /// 中止した場合は `true`
    pub async fn stop(&self, room_id: &RoomId) -> bool {
        let mut countdowns = self.countdowns.lock().await;
        match countdowns.remove(room_id) {
            Some(task) => {
                task.handle.abort();
                tracing::info!("Countdown stopped for room '{}'", room_id);
                true
            }
            None => false,
        }
    }

    pub async fn is_running(&self, room_id: &RoomId) -> bool {
        self.countdowns.lock().await.contains_key(room_id)
    }
}

async fn run_countdown(
    room_id: RoomId,
    generation: u64,
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    countdowns: CountdownTable,
    tick_period: Duration,
) {
    let mut interval = interval_at(Instant::now() + tick_period, tick_period);

    loop {
        interval.tick().await;

        // tick の配信と他のハンドラの配信が入れ替わらないよう、配信し終えるまで保持する
        let _guard = repository.lock_room(&room_id).await;
        let room = match repository
            .update_room(
                &room_id,
                Box::new(|room, _| room.tick_countdown().map(|_| ())),
            )
            .await
        {
            Ok(room) => room,
            Err(e) => {
                tracing::debug!("Countdown for room '{}' ended: {}", room_id, e);
                break;
            }
        };

        let targets = room.participant_ids();
        let remaining = room.countdown.unwrap_or(0);
        if let Err(e) = message_pusher
            .broadcast(targets.clone(), &Notification::TimerUpdate { remaining })
            .await
        {
            tracing::warn!("Failed to broadcast timer update: {}", e);
        }

        if room.countdown.is_none() {
            if let Err(e) = message_pusher
                .broadcast(targets, &Notification::time_up())
                .await
            {
                tracing::warn!("Failed to broadcast game over: {}", e);
            }
            tracing::info!("Time is up in room '{}'", room_id);
            break;
        }
    }

    let mut countdowns = countdowns.lock().await;
    if countdowns
        .get(&room_id)
        .is_some_and(|task| task.generation == generation)
    {
        countdowns.remove(&room_id);
    }
}

//! UseCase テスト用の共通部品

use std::sync::Arc;

use masu_shared::time::ManualClock;
use tokio::sync::mpsc;

use crate::{
    domain::{
        ClientId, DisplayName, GeneratedPuzzle, Grid, MessagePusher, Participant, PuzzleGenerator,
        Room, RoomId, RoomRepository,
        grid::tests::{SOLVED, sample_puzzle},
    },
    infrastructure::{
        dto::websocket::ServerMessage, message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
};

/// 常に同じパズル（空セル 4 つ）を返す生成器
pub(crate) struct FixedPuzzleGenerator;

impl PuzzleGenerator for FixedPuzzleGenerator {
    fn generate(&self) -> GeneratedPuzzle {
        GeneratedPuzzle {
            puzzle: sample_puzzle(),
            solution: Grid::from_rows(SOLVED).unwrap(),
        }
    }
}

/// インメモリ Repository と WebSocket Pusher を組み合わせたテスト環境
pub(crate) struct Harness {
    pub repository: Arc<InMemoryRoomRepository>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(1_000));
        Self {
            repository: Arc::new(InMemoryRoomRepository::new(clock.clone())),
            pusher: Arc::new(WebSocketMessagePusher::default()),
            clock,
        }
    }

    /// `name` を ClientId として接続を登録し、受信側を返す
    pub async fn connect(&self, name: &str) -> (ClientId, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client_id = ClientId::new(name.to_string()).unwrap();
        self.pusher.register_client(client_id.clone(), tx).await;
        (client_id, rx)
    }
}

/// 受信済みのメッセージを全て取り出す
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(text) = rx.try_recv() {
        messages.push(serde_json::from_str(&text).unwrap());
    }
    messages
}

pub(crate) fn room_id(value: &str) -> RoomId {
    RoomId::new(value.to_string()).unwrap()
}

pub(crate) fn display_name(value: &str) -> DisplayName {
    DisplayName::new(value.to_string()).unwrap()
}

/// admin 名 "Alice" の Room "1234" を作り、`members` を順に参加させる
pub(crate) async fn seed_room(harness: &Harness, admin: &ClientId, members: &[&ClientId]) -> Room {
    let admin = admin.clone();
    harness
        .repository
        .create_if_absent(
            room_id("1234"),
            Box::new(move |now| {
                let GeneratedPuzzle { puzzle, solution } = FixedPuzzleGenerator.generate();
                Room::new(room_id("1234"), puzzle, solution, admin, display_name("Alice"), true, now)
            }),
        )
        .await
        .unwrap();
    let members: Vec<ClientId> = members.iter().map(|id| (*id).clone()).collect();
    harness
        .repository
        .update_room(
            &room_id("1234"),
            Box::new(move |room, now| {
                for id in members {
                    room.add_participant(Participant::new(id, now));
                }
                Ok(())
            }),
        )
        .await
        .unwrap()
}

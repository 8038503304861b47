//! Integration tests for the room server.
//!
//! Each test boots the router on an ephemeral port and drives it over a real WebSocket
//! and HTTP connection.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use masu_server::{
    config::ServerConfig,
    domain::{Grid, is_valid_placement},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, puzzle::BacktrackingPuzzleGenerator,
        repository::InMemoryRoomRepository,
    },
    ui::{AppState, Server},
};
use masu_shared::time::SystemClock;
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper struct to manage an in-process server
struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start(config: ServerConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(
            &config,
            Arc::new(InMemoryRoomRepository::new(Arc::new(SystemClock))),
            Arc::new(WebSocketMessagePusher::default()),
            Arc::new(BacktrackingPuzzleGenerator::new(config.removed_cells.clone())),
        ));
        let handle = tokio::spawn(async move {
            let _ = Server::new(state).serve(listener).await;
        });
        TestServer { addr, handle }
    }

    /// Server with a fast countdown so timer scenarios finish quickly
    async fn start_fast() -> Self {
        Self::start(ServerConfig {
            tick_period: Duration::from_millis(20),
            ..ServerConfig::default()
        })
        .await
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Helper struct wrapping one WebSocket connection
struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl TestClient {
    async fn connect(url: &str) -> Self {
        let (stream, _) = connect_async(url).await.unwrap();
        TestClient { stream }
    }

    async fn send(&mut self, value: Value) {
        self.stream
            .send(Message::Text(value.to_string().into()))
            .await
            .unwrap();
    }

    /// Receive the next JSON frame
    async fn next_json(&mut self) -> Value {
        tokio::time::timeout(RECV_TIMEOUT, async {
            loop {
                match self.stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return serde_json::from_str::<Value>(text.as_str()).unwrap();
                    }
                    Some(Ok(_)) => continue,
                    other => panic!("connection ended unexpectedly: {:?}", other),
                }
            }
        })
        .await
        .expect("timed out waiting for a message")
    }

    /// Skip frames until one with the given type arrives
    async fn next_of_type(&mut self, message_type: &str) -> Value {
        loop {
            let value = self.next_json().await;
            if value["type"] == message_type {
                return value;
            }
        }
    }

    async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

fn parse_grid(value: &Value) -> Grid {
    let rows: [[u8; 9]; 9] = serde_json::from_value(value.clone()).unwrap();
    Grid::from_rows(rows).unwrap()
}

/// Find an empty cell and a digit that may legally go there
fn legal_move(grid: &Grid) -> (usize, usize, u8) {
    for row in 0..9 {
        for col in 0..9 {
            if grid.get(row, col) != Some(0) {
                continue;
            }
            if let Some(value) = (1..=9).find(|&v| is_valid_placement(grid, row, col, v)) {
                return (row, col, value);
            }
        }
    }
    panic!("no legal move on the board");
}

/// Alice creates room "1234" and Bob joins it. Returns both clients with their queues drained
/// up to Bob's initial board, plus the puzzle grid.
async fn alice_and_bob(server: &TestServer) -> (TestClient, TestClient, Grid) {
    let mut alice = TestClient::connect(&server.ws_url()).await;
    alice
        .send(json!({"type": "create_room", "room_id": "1234", "display_name": "Alice", "ready": true}))
        .await;
    alice.next_of_type("initial_board").await;

    let mut bob = TestClient::connect(&server.ws_url()).await;
    bob.send(json!({"type": "join_room", "room_id": "1234"}))
        .await;
    let board = bob.next_of_type("initial_board").await;
    alice.next_of_type("user_count_update").await;

    (alice, bob, parse_grid(&board["grid"]))
}

#[tokio::test]
async fn test_health_and_missing_room_endpoints() {
    // テスト項目: ヘルスチェックと、存在しない Room の詳細が 404 になること
    // given (前提条件):
    let server = TestServer::start_fast().await;
    let http = reqwest::Client::new();

    // when (操作):
    let health: Value = http
        .get(server.http_url("/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let missing = http
        .get(server.http_url("/api/rooms/9999"))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health, json!({"status": "ok"}));
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_and_join_room() {
    // テスト項目: 作成者が admin 名とパズルを受け取り、参加で全員に人数 2 が届く
    // given (前提条件):
    let server = TestServer::start_fast().await;
    let mut alice = TestClient::connect(&server.ws_url()).await;

    // when (操作):
    alice
        .send(json!({"type": "create_room", "room_id": "1234", "display_name": "Alice", "ready": true}))
        .await;

    // then (期待する結果):
    assert_eq!(
        alice.next_json().await,
        json!({"type": "admin", "display_name": "Alice"})
    );
    assert_eq!(
        alice.next_json().await,
        json!({"type": "user_count_update", "count": 1})
    );
    let initial = alice.next_json().await;
    assert_eq!(initial["type"], "initial_board");
    let puzzle = parse_grid(&initial["grid"]);
    assert!((50..=60).contains(&puzzle.empty_cells()));

    // when (操作):
    let mut bob = TestClient::connect(&server.ws_url()).await;
    bob.send(json!({"type": "join_room", "room_id": "1234"}))
        .await;

    // then (期待する結果):
    assert_eq!(
        bob.next_json().await,
        json!({"type": "admin", "display_name": "Alice"})
    );
    assert_eq!(
        bob.next_json().await,
        json!({"type": "user_count_update", "count": 2})
    );
    let bob_board = bob.next_json().await;
    assert_eq!(parse_grid(&bob_board["grid"]), puzzle);
    assert_eq!(
        alice.next_json().await,
        json!({"type": "user_count_update", "count": 2})
    );

    let rooms: Value = reqwest::get(server.http_url("/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rooms[0]["id"], "1234");
    assert_eq!(rooms[0]["participant_count"], 2);
    assert_eq!(rooms[0]["admin"], "Alice");
    assert_eq!(rooms[0]["phase"], "lobby");
}

#[tokio::test]
async fn test_join_missing_room_returns_join_error() {
    // テスト項目: 存在しない Room への参加で join_error が届き、Room は作られない
    // given (前提条件):
    let server = TestServer::start_fast().await;
    let mut carol = TestClient::connect(&server.ws_url()).await;

    // when (操作):
    carol
        .send(json!({"type": "join_room", "room_id": "4321"}))
        .await;

    // then (期待する結果):
    assert_eq!(
        carol.next_json().await,
        json!({"type": "join_error", "message": "Room does not exist. Please create a room first."})
    );
    let rooms: Value = reqwest::get(server.http_url("/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rooms, json!([]));
}

#[tokio::test]
async fn test_countdown_runs_to_game_over() {
    // テスト項目: 開始で admin_started(false) が届き、残り秒数が減って game_over が 1 度だけ届く
    // given (前提条件):
    let server = TestServer::start_fast().await;
    let (mut alice, mut bob, _) = alice_and_bob(&server).await;

    // when (操作):
    alice
        .send(json!({"type": "start_room", "room_id": "1234", "duration": 3}))
        .await;

    // then (期待する結果):
    let expected_start = json!({"type": "admin_started", "ready": false});
    assert_eq!(alice.next_json().await, expected_start);
    assert_eq!(bob.next_json().await, expected_start);

    let mut remaining = Vec::new();
    loop {
        let message = bob.next_json().await;
        match message["type"].as_str() {
            Some("timer_update") => remaining.push(message["remaining"].as_u64().unwrap()),
            Some("game_over") => {
                assert_eq!(message, json!({"type": "game_over", "winner": null, "message": "Time is up!"}));
                break;
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
    assert_eq!(remaining, vec![2, 1, 0]);

    let detail: Value = reqwest::get(server.http_url("/api/rooms/1234"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["phase"], "ended");
    assert_eq!(detail["countdown_remaining"], Value::Null);
}

#[tokio::test]
async fn test_edits_are_shared_and_validated() {
    // テスト項目: 有効な編集は全員に届き、given の上書きは拒否されて盤面が送り直される
    // given (前提条件):
    let server = TestServer::start_fast().await;
    let (mut alice, mut bob, puzzle) = alice_and_bob(&server).await;
    alice
        .send(json!({"type": "start_room", "room_id": "1234", "duration": 300}))
        .await;
    bob.next_of_type("admin_started").await;
    let (row, col, value) = legal_move(&puzzle);

    // when (操作):
    bob.send(json!({"type": "edit_cell", "room_id": "1234", "row": row, "col": col, "value": value}))
        .await;

    // then (期待する結果): 編集者自身にも確認として同じ盤面が届く
    let update = alice.next_of_type("board_update").await;
    assert_eq!(parse_grid(&update["grid"]).get(row, col), Some(value));
    let echo = bob.next_of_type("board_update").await;
    assert_eq!(echo["grid"], update["grid"]);

    // when (操作): 最初の given セルを上書きしようとする
    let (given_row, given_col) = (0..81)
        .map(|i| (i / 9, i % 9))
        .find(|&(r, c)| puzzle.is_given(r, c))
        .unwrap();
    bob.send(json!({"type": "edit_cell", "room_id": "1234", "row": given_row, "col": given_col, "value": 1}))
        .await;

    // then (期待する結果): 拒否の直後に記録済みの盤面が送り直される
    let rejected = bob.next_of_type("edit_rejected").await;
    assert!(rejected["message"].is_string());
    let resync = bob.next_of_type("board_update").await;
    assert_eq!(resync["grid"], update["grid"]);
}

#[tokio::test]
async fn test_leave_cancels_countdown() {
    // テスト項目: 2 人中 1 人が退出すると人数 1 が届き、カウントダウンが止まる
    // given (前提条件):
    let server = TestServer::start_fast().await;
    let (mut alice, mut bob, _) = alice_and_bob(&server).await;
    alice
        .send(json!({"type": "start_room", "room_id": "1234", "duration": 300}))
        .await;
    bob.next_of_type("timer_update").await;

    // when (操作):
    bob.send(json!({"type": "leave_room", "room_id": "1234"}))
        .await;

    // then (期待する結果):
    assert_eq!(
        alice.next_of_type("user_count_update").await,
        json!({"type": "user_count_update", "count": 1})
    );
    let detail: Value = reqwest::get(server.http_url("/api/rooms/1234"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["countdown_remaining"], Value::Null);
    assert_eq!(detail["participants"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_submit_announces_winner_to_room() {
    // テスト項目: 提出で勝者名と解答が全員に届く
    // given (前提条件):
    let server = TestServer::start_fast().await;
    let (mut alice, mut bob, puzzle) = alice_and_bob(&server).await;

    // when (操作):
    bob.send(json!({"type": "submit", "display_name": "Bob", "room_id": "1234"}))
        .await;

    // then (期待する結果):
    let winner = alice.next_of_type("winner").await;
    assert_eq!(winner["display_name"], "Bob");
    assert_eq!(winner["declared"], true);
    let solution = parse_grid(&winner["solution"]);
    assert!(solution.is_solved());
    assert!(puzzle.is_derived_from(&solution));
    assert_eq!(bob.next_of_type("winner").await, winner);
}

#[tokio::test]
async fn test_disconnect_updates_remaining_participants() {
    // テスト項目: 接続が切れると残りの参加者に人数が届く
    // given (前提条件):
    let server = TestServer::start_fast().await;
    let (mut alice, bob, _) = alice_and_bob(&server).await;

    // when (操作):
    bob.close().await;

    // then (期待する結果):
    assert_eq!(
        alice.next_of_type("user_count_update").await,
        json!({"type": "user_count_update", "count": 1})
    );
}

//! UseCase: 提出（勝者宣言）
//!
//! 提出を受けると勝者フラグを切り替え、提出者の名前と解答を全員に配信する。
//! 盤面の検証は設定で有効にした場合だけ行う。
//!
//! ## テスト実装の作業記録
//!
//! ### どのような状況を想定しているか
//! - 正常系：提出で winner(declared=true) と解答が全員に届き、タイマーが止まる
//! - 正常系：二度目の提出で declared=false に戻る
//! - 異常系：検証有効時の未完成・不一致の盤面、参加していない Room への提出

use std::sync::Arc;

use crate::domain::{
    ClientId, DisplayName, DomainError, MessagePusher, Notification, RepositoryError, RoomId,
    RoomRepository,
};

use super::{error::SubmitError, timer::TimerService};

/// 提出のユースケース
pub struct SubmitUseCase {
    repository: Arc<dyn RoomRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    timer: Arc<TimerService>,
    /// 勝者宣言の前に盤面を解答と照合するか
    verify_submissions: bool,
}

impl SubmitUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        timer: Arc<TimerService>,
        verify_submissions: bool,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            timer,
            verify_submissions,
        }
    }

    /// # Returns
    ///
    /// * `Ok(bool)` - 切り替え後の勝者フラグ
    pub async fn execute(
        &self,
        client_id: &ClientId,
        room_id: &RoomId,
        display_name: DisplayName,
    ) -> Result<bool, SubmitError> {
        let _guard = self.repository.lock_room(room_id).await;

        let submitter = client_id.clone();
        let verify = self.verify_submissions;
        let result = self
            .repository
            .update_room(
                room_id,
                Box::new(move |room, _| {
                    if !room.contains(&submitter) {
                        return Err(DomainError::NotParticipant);
                    }
                    room.declare_winner(verify).map(|_| ())
                }),
            )
            .await;

        let room = match result {
            Ok(room) => room,
            Err(RepositoryError::Domain(e)) => {
                tracing::info!("Submission by '{}' rejected: {}", client_id, e);
                let rejection = Notification::ActionRejected {
                    message: e.to_string(),
                };
                if let Err(e) = self.message_pusher.push_to(client_id, &rejection).await {
                    tracing::warn!("Failed to push rejection: {}", e);
                }
                return Err(SubmitError::Rejected(e));
            }
            Err(e) => return Err(e.into()),
        };

        if room.winner_declared {
            tracing::info!(
                "'{}' declared the winner of room '{}'",
                display_name.as_str(),
                room_id
            );
            self.timer.stop(room_id).await;
        }

        let notification = Notification::Winner {
            display_name,
            declared: room.winner_declared,
            solution: *room.solution(),
        };
        if let Err(e) = self
            .message_pusher
            .broadcast(room.participant_ids(), &notification)
            .await
        {
            tracing::warn!("Failed to broadcast winner: {}", e);
        }

        Ok(room.winner_declared)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        domain::{RoomPhase, grid::tests::SOLVED},
        infrastructure::dto::websocket::ServerMessage,
        usecase::test_support::{Harness, display_name, drain, room_id, seed_room},
    };

    fn create_usecase(harness: &Harness, verify: bool) -> (SubmitUseCase, Arc<TimerService>) {
        let timer = Arc::new(TimerService::new(
            harness.repository.clone(),
            harness.pusher.clone(),
            Duration::from_secs(1),
        ));
        let usecase = SubmitUseCase::new(
            harness.repository.clone(),
            harness.pusher.clone(),
            timer.clone(),
            verify,
        );
        (usecase, timer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_declares_winner_and_stops_timer() {
        // テスト項目: 提出で winner が全員に届き、ゲームが終わってタイマーが止まる
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_rx) = harness.connect("alice").await;
        let (bob, mut bob_rx) = harness.connect("bob").await;
        seed_room(&harness, &alice, &[&alice, &bob]).await;
        let (usecase, timer) = create_usecase(&harness, false);
        let admin = alice.clone();
        harness
            .repository
            .update_room(
                &room_id("1234"),
                Box::new(move |room, _| room.toggle_ready(&admin, 300).map(|_| ())),
            )
            .await
            .unwrap();
        timer.start(room_id("1234")).await;

        // when (操作):
        let declared = usecase
            .execute(&bob, &room_id("1234"), display_name("Bob"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(declared);
        assert!(!timer.is_running(&room_id("1234")).await);
        let expected = vec![ServerMessage::Winner {
            display_name: "Bob".to_string(),
            declared: true,
            solution: SOLVED,
        }];
        assert_eq!(drain(&mut alice_rx), expected);
        assert_eq!(drain(&mut bob_rx), expected);
        let room = harness.repository.get_room(&room_id("1234")).await.unwrap();
        assert_eq!(room.phase, RoomPhase::Ended);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(drain(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_second_submit_toggles_flag_back() {
        // テスト項目: 二度目の提出で declared が false に戻る
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_rx) = harness.connect("alice").await;
        seed_room(&harness, &alice, &[&alice]).await;
        let (usecase, _timer) = create_usecase(&harness, false);
        usecase
            .execute(&alice, &room_id("1234"), display_name("Alice"))
            .await
            .unwrap();
        drain(&mut alice_rx);

        // when (操作):
        let declared = usecase
            .execute(&alice, &room_id("1234"), display_name("Alice"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(!declared);
        assert!(matches!(
            drain(&mut alice_rx).as_slice(),
            [ServerMessage::Winner { declared: false, .. }]
        ));
    }

    #[tokio::test]
    async fn test_verified_submit_rejects_incomplete_board() {
        // テスト項目: 検証有効時、未完成の盤面の提出は拒否される
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_rx) = harness.connect("alice").await;
        seed_room(&harness, &alice, &[&alice]).await;
        let (usecase, _timer) = create_usecase(&harness, true);

        // when (操作):
        let result = usecase
            .execute(&alice, &room_id("1234"), display_name("Alice"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SubmitError::Rejected(DomainError::IncompleteSubmission))
        );
        assert!(matches!(
            drain(&mut alice_rx).as_slice(),
            [ServerMessage::ActionRejected { .. }]
        ));
    }

    #[tokio::test]
    async fn test_verified_submit_accepts_solved_board() {
        // テスト項目: 検証有効時、解答と一致する盤面の提出は受理される
        // given (前提条件):
        let harness = Harness::new();
        let (alice, _alice_rx) = harness.connect("alice").await;
        seed_room(&harness, &alice, &[&alice]).await;
        let (usecase, _timer) = create_usecase(&harness, true);
        let admin = alice.clone();
        harness
            .repository
            .update_room(
                &room_id("1234"),
                Box::new(move |room, _| {
                    room.toggle_ready(&admin, 300)?;
                    room.apply_edit(&admin, 0, 0, 5)?;
                    room.apply_edit(&admin, 0, 1, 3)?;
                    room.apply_edit(&admin, 0, 2, 4)?;
                    room.apply_edit(&admin, 8, 8, 9)
                }),
            )
            .await
            .unwrap();

        // when (操作):
        let declared = usecase
            .execute(&alice, &room_id("1234"), display_name("Alice"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(declared);
    }

    #[tokio::test]
    async fn test_outsider_cannot_submit() {
        // テスト項目: 参加していない Room への提出は拒否される
        // given (前提条件):
        let harness = Harness::new();
        let (alice, mut alice_rx) = harness.connect("alice").await;
        let (mallory, _mallory_rx) = harness.connect("mallory").await;
        seed_room(&harness, &alice, &[&alice]).await;
        let (usecase, _timer) = create_usecase(&harness, false);

        // when (操作):
        let result = usecase
            .execute(&mallory, &room_id("1234"), display_name("Mallory"))
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(SubmitError::Rejected(DomainError::NotParticipant))
        );
        assert!(drain(&mut alice_rx).is_empty());
    }
}

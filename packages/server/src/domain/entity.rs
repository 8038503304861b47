//! エンティティ: Room と Participant
//!
//! Room は 1 つのパズルとその参加者、ゲーム進行状態を保持する集約。
//! 状態遷移はすべてこのモジュールのメソッドを通して行う。

use masu_shared::time::elapsed_millis;

use super::{
    error::DomainError,
    grid::{GRID_SIZE, Grid, is_valid_placement},
    value_object::{ClientId, DisplayName, RoomId, Timestamp},
};

/// Room の進行フェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    /// admin の開始待ち。admin 以外は盤面を編集できない
    Lobby,
    /// 盤面が編集可能。カウントダウン中
    Active,
    /// 時間切れ、または勝者宣言済み
    Ended,
}

impl RoomPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lobby => "lobby",
            Self::Active => "active",
            Self::Ended => "ended",
        }
    }
}

/// Room に参加している接続
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ClientId,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(id: ClientId, joined_at: Timestamp) -> Self {
        Self { id, joined_at }
    }
}

/// ゲームセッション
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    /// 生成時のパズル。空でないセルは given として変更不可
    pub puzzle: Grid,
    /// 最新の盤面
    pub board: Grid,
    solution: Grid,
    /// 参加順。重複なし
    pub participants: Vec<Participant>,
    pub admin: ClientId,
    pub admin_name: DisplayName,
    /// admin が切り替えるフラグ。`false` に切り替わるとゲームが始まる
    pub ready: bool,
    pub phase: RoomPhase,
    /// カウントダウンの残り秒数。動いていなければ `None`
    pub countdown: Option<u32>,
    pub winner_declared: bool,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
}

impl Room {
    /// パズルと解答から Room を作成する。
    ///
    /// 解答は完成した正しい盤面で、パズルはそのセルを空にしただけのものでなければならない。
    /// 作成者は admin になるが、参加者への追加は参加処理で行う。
    pub fn new(
        id: RoomId,
        puzzle: Grid,
        solution: Grid,
        admin: ClientId,
        admin_name: DisplayName,
        ready: bool,
        created_at: Timestamp,
    ) -> Result<Self, DomainError> {
        if !solution.is_solved() || !puzzle.is_derived_from(&solution) {
            return Err(DomainError::PuzzleMismatch);
        }
        Ok(Self {
            id,
            puzzle,
            board: puzzle,
            solution,
            participants: Vec::new(),
            admin,
            admin_name,
            ready,
            phase: RoomPhase::Lobby,
            countdown: None,
            winner_declared: false,
            created_at,
            last_activity: created_at,
        })
    }

    pub fn solution(&self) -> &Grid {
        &self.solution
    }

    pub fn participant_ids(&self) -> Vec<ClientId> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn contains(&self, client_id: &ClientId) -> bool {
        self.participants.iter().any(|p| &p.id == client_id)
    }

    pub fn is_admin(&self, client_id: &ClientId) -> bool {
        &self.admin == client_id
    }

    /// 参加者を追加する。既に参加していれば何もせず `false` を返す。
    pub fn add_participant(&mut self, participant: Participant) -> bool {
        if self.contains(&participant.id) {
            return false;
        }
        self.participants.push(participant);
        true
    }

    /// 参加者を削除する。参加していなければ `NotParticipant`。
    ///
    /// 残りが `min_players` 未満になったらカウントダウンも止める。
    pub fn remove_participant(
        &mut self,
        client_id: &ClientId,
        min_players: usize,
    ) -> Result<(), DomainError> {
        let before = self.participants.len();
        self.participants.retain(|p| &p.id != client_id);
        if self.participants.len() == before {
            return Err(DomainError::NotParticipant);
        }
        if self.participants.len() < min_players {
            self.cancel_countdown();
        }
        Ok(())
    }

    /// admin による ready フラグの切り替え。
    ///
    /// `false` になったらゲーム開始: フェーズを Active にし、`duration` 秒の
    /// カウントダウンをセットして勝者フラグをリセットする。
    /// `true` に戻ったら Lobby に戻りカウントダウンを止める。
    pub fn toggle_ready(
        &mut self,
        requester: &ClientId,
        duration: u32,
    ) -> Result<bool, DomainError> {
        if !self.is_admin(requester) {
            return Err(DomainError::NotAdmin);
        }
        self.ready = !self.ready;
        if self.ready {
            self.phase = RoomPhase::Lobby;
            self.countdown = None;
        } else {
            self.phase = RoomPhase::Active;
            self.countdown = Some(duration);
            self.winner_declared = false;
        }
        Ok(self.ready)
    }

    /// カウントダウンを 1 秒進め、残り秒数を返す。
    ///
    /// 0 に達したらカウントダウンを解除してフェーズを Ended にする。
    pub fn tick_countdown(&mut self) -> Result<u32, DomainError> {
        let remaining = self.countdown.ok_or(DomainError::CountdownInactive)?;
        let next = remaining.saturating_sub(1);
        if next == 0 {
            self.countdown = None;
            self.phase = RoomPhase::Ended;
        } else {
            self.countdown = Some(next);
        }
        Ok(next)
    }

    /// カウントダウンを止める。動いていなければ `false`。
    pub fn cancel_countdown(&mut self) -> bool {
        self.countdown.take().is_some()
    }

    /// 参加者によるセル編集。記録する前にルールを検証する。
    pub fn apply_edit(
        &mut self,
        editor: &ClientId,
        row: usize,
        col: usize,
        value: u8,
    ) -> Result<(), DomainError> {
        if !self.contains(editor) {
            return Err(DomainError::NotParticipant);
        }
        match self.phase {
            RoomPhase::Ended => return Err(DomainError::GameNotActive),
            RoomPhase::Lobby if !self.is_admin(editor) => {
                return Err(DomainError::GameNotActive);
            }
            _ => {}
        }
        if row >= GRID_SIZE || col >= GRID_SIZE {
            return Err(DomainError::OutOfBounds { row, col });
        }
        if self.puzzle.is_given(row, col) {
            return Err(DomainError::FixedCellEdit { row, col });
        }
        if !is_valid_placement(&self.board, row, col, value) {
            return Err(DomainError::InvalidPlacement { row, col, value });
        }
        self.board.set(row, col, value);
        Ok(())
    }

    /// 提出を受けて勝者フラグを切り替える。
    ///
    /// `verify` が `false` の場合は盤面を確認しない（提出内容をそのまま信頼する）。
    /// `true` の場合は最新の盤面が解答と一致しなければ拒否する。
    /// フラグが立ったらゲームは終了し、カウントダウンも止まる。
    /// フラグが戻ってもゲームは再開せず、次に admin が開始するまで Ended のまま。
    pub fn declare_winner(&mut self, verify: bool) -> Result<bool, DomainError> {
        if verify {
            if !self.board.is_complete() {
                return Err(DomainError::IncompleteSubmission);
            }
            if self.board != self.solution {
                return Err(DomainError::SubmissionMismatch);
            }
        }
        self.winner_declared = !self.winner_declared;
        if self.winner_declared {
            self.phase = RoomPhase::Ended;
            self.countdown = None;
        }
        Ok(self.winner_declared)
    }

    pub fn touch(&mut self, now: Timestamp) {
        if now > self.last_activity {
            self.last_activity = now;
        }
    }

    /// 参加者がおらず、最終アクティビティから `idle_timeout_millis` 以上経過しているか
    pub fn is_idle(&self, now: Timestamp, idle_timeout_millis: i64) -> bool {
        self.participants.is_empty()
            && elapsed_millis(self.last_activity.value(), now.value()) >= idle_timeout_millis
    }
}

//! Repository trait 定義
//!
//! ドメイン層が必要とする Room Store へのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 原子性
//!
//! 状態の変更は `create_if_absent` / `update_room` / `remove_rooms_where` に渡す
//! クロージャの中で行う。実装は 1 回の呼び出しの間、他の変更が割り込まないことを保証する。
//!
//! 変更とその通知を 1 つの単位にしたい場合は、先に `lock_room` で Room 単位のロックを取り、
//! 通知を送り終えるまでガードを保持する。ロックの順序は常に
//! 「Room 単位のロック → Repository 内部のロック」で、逆順に取ることはない。

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use super::{ClientId, DomainError, RepositoryError, Room, RoomId, Timestamp};

/// Room が存在しない場合にだけ呼ばれる生成処理（引数は現在時刻）
pub type RoomFactory = Box<dyn FnOnce(Timestamp) -> Result<Room, DomainError> + Send>;

/// Room に対する変更処理（引数は現在時刻）
pub type RoomMutation = Box<dyn FnOnce(&mut Room, Timestamp) -> Result<(), DomainError> + Send>;

/// 削除対象の判定（引数は現在時刻）
pub type RoomPredicate = Box<dyn Fn(&Room, Timestamp) -> bool + Send + Sync>;

/// `lock_room` が返すガード。drop するとロックが外れる
pub type RoomGuard = OwnedMutexGuard<()>;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room のスナップショットを取得
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// 全ての Room のスナップショットを ID 順で取得
    async fn list_rooms(&self) -> Vec<Room>;

    /// Room が無ければ `factory` で作成する。
    ///
    /// 戻り値は Room のスナップショットと、新規作成したかどうか。
    async fn create_if_absent(
        &self,
        room_id: RoomId,
        factory: RoomFactory,
    ) -> Result<(Room, bool), RepositoryError>;

    /// Room を変更し、変更後のスナップショットを返す。
    ///
    /// `mutation` がエラーを返した場合、Room は変更されない。
    async fn update_room(
        &self,
        room_id: &RoomId,
        mutation: RoomMutation,
    ) -> Result<Room, RepositoryError>;

    /// Room を削除。存在しなければ `None`
    async fn remove_room(&self, room_id: &RoomId) -> Option<Room>;

    /// 条件に一致する Room をまとめて削除し、削除した Room を返す
    async fn remove_rooms_where(&self, predicate: RoomPredicate) -> Vec<Room>;

    /// 指定したクライアントが参加している Room の ID
    async fn rooms_of(&self, client_id: &ClientId) -> Vec<RoomId>;

    /// Room 単位の排他ロックを取得する。
    ///
    /// ガードを保持している間、同じ Room ID に対する他の `lock_room` は待たされる。
    /// Room が存在しなくても取得できる。
    async fn lock_room(&self, room_id: &RoomId) -> RoomGuard;
}

//! ドメイン層
//!
//! Room のライフサイクル、盤面ルール、プロトコルが扱う通知を定義します。
//! データストア・通知手段・パズル生成はトレイトとしてここで定義し、
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

pub mod entity;
pub mod error;
pub mod factory;
pub mod grid;
pub mod message_pusher;
pub mod notification;
pub mod puzzle;
pub mod repository;
pub mod value_object;

pub use entity::{Participant, Room, RoomPhase};
pub use error::{DomainError, MessagePushError, RepositoryError};
pub use factory::RoomIdFactory;
pub use grid::{Grid, is_valid_placement};
pub use message_pusher::{MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use notification::{Notification, TIME_UP_MESSAGE};
pub use puzzle::{GeneratedPuzzle, PuzzleGenerator};
pub use repository::{RoomFactory, RoomGuard, RoomMutation, RoomPredicate, RoomRepository};
pub use value_object::{ClientId, DisplayName, RoomId, Timestamp};

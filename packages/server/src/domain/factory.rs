//! Room ID の生成

use rand::Rng;

use super::{error::DomainError, value_object::RoomId};

/// 4 桁の数字からなる Room ID を生成するファクトリ
///
/// 衝突は確認しない。既存の ID で `create_room` した場合は参加として扱われる。
pub struct RoomIdFactory;

impl RoomIdFactory {
    pub fn generate() -> Result<RoomId, DomainError> {
        let code: u16 = rand::thread_rng().gen_range(1000..=9999);
        RoomId::new(code.to_string())
    }
}

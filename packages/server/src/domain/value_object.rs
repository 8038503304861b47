//! 値オブジェクト
//!
//! 生成時にバリデーションを行い、不正な値がドメインに入り込まないようにします。

use uuid::Uuid;

use super::error::DomainError;

const ROOM_ID_MAX_LEN: usize = 32;
const DISPLAY_NAME_MAX_LEN: usize = 32;

/// Room の識別子
///
/// クライアントが生成する 4 桁の数字が基本だが、英数字・`-`・`_` からなる
/// 32 文字以内の文字列であれば受け付ける。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= ROOM_ID_MAX_LEN
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DomainError::InvalidRoomId(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 接続ごとに払い出される識別子
///
/// 表示名とは独立しているため、同じ表示名の参加者が複数いても区別できる。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidClientId(value));
        }
        Ok(Self(value))
    }

    /// 新しい接続用の ID を払い出す（UUID v4）
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 参加者の表示名
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, DomainError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().count() > DISPLAY_NAME_MAX_LEN {
            return Err(DomainError::InvalidDisplayName(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_accepts_four_digit_code() {
        // テスト項目: 4 桁の数字は RoomId として受け付けられる
        // given (前提条件):
        let value = "1234".to_string();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "1234");
    }

    #[test]
    fn test_room_id_trims_whitespace() {
        // テスト項目: 前後の空白は取り除かれる
        // given (前提条件):
        let value = "  5678 ".to_string();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "5678");
    }

    #[test]
    fn test_room_id_rejects_empty_and_symbols() {
        // テスト項目: 空文字列や記号を含む ID は拒否される
        // given (前提条件):
        let inputs = ["", "   ", "12 34", "room/1", &"9".repeat(33)];

        for input in inputs {
            // when (操作):
            let result = RoomId::new(input.to_string());

            // then (期待する結果):
            assert!(
                matches!(result, Err(DomainError::InvalidRoomId(_))),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_client_id_generate_is_unique() {
        // テスト項目: 払い出される ClientId は毎回異なる
        // given (前提条件):

        // when (操作):
        let first = ClientId::generate();
        let second = ClientId::generate();

        // then (期待する結果):
        assert_ne!(first, second);
    }

    #[test]
    fn test_display_name_validation() {
        // テスト項目: 表示名は空白のみや長すぎる場合に拒否される
        // given (前提条件):
        let ok = DisplayName::new(" Alice ".to_string());
        let empty = DisplayName::new("  ".to_string());
        let too_long = DisplayName::new("a".repeat(33));

        // when (操作) / then (期待する結果):
        assert_eq!(ok.unwrap().as_str(), "Alice");
        assert!(matches!(empty, Err(DomainError::InvalidDisplayName(_))));
        assert!(matches!(too_long, Err(DomainError::InvalidDisplayName(_))));
    }
}

//! 値オブジェクト
//!
//! 識別子・メディアアドレス・チャット内容などの不変な値を表現します。
//! 生成時にバリデーションを行い、不正な値がドメイン層に入り込まないようにします。

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// メディアアドレスの最大長（文字数）
pub const MAX_MEDIA_ADDRESS_LENGTH: usize = 256;
/// チャットのユーザー名の最大長（文字数）
pub const MAX_CHAT_USER_LENGTH: usize = 32;
/// チャット本文の最大長（文字数）
pub const MAX_CHAT_TEXT_LENGTH: usize = 500;
/// ユーザー名が空の場合に使う名前
pub const ANONYMOUS_USER: &str = "Anonymous";

/// 接続 ID（コネクションごとに払い出される不透明な識別子）
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyConnectionId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ConnectionId の生成
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// UUID v4 から新しい ConnectionId を生成
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// メディアアドレス
///
/// 視聴者のメディア層が配信者（またはその逆）に到達するために必要な不透明な文字列。
/// サーバーは中身を解釈せず、中継するだけ。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaAddress(String);

impl MediaAddress {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyMediaAddress);
        }
        if trimmed.chars().count() > MAX_MEDIA_ADDRESS_LENGTH {
            return Err(ValueObjectError::MediaAddressTooLong {
                max: MAX_MEDIA_ADDRESS_LENGTH,
            });
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

impl TryFrom<String> for MediaAddress {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 配信ソースの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Camera,
    Screen,
    #[serde(alias = "video")]
    File,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Camera => "camera",
            SourceKind::Screen => "screen",
            SourceKind::File => "file",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "camera" => Ok(SourceKind::Camera),
            "screen" => Ok(SourceKind::Screen),
            "file" | "video" => Ok(SourceKind::File),
            other => Err(ValueObjectError::UnknownSourceKind(other.to_string())),
        }
    }
}

/// チャットの表示名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatUser(String);

impl ChatUser {
    /// 入力値から表示名を作る（空の場合は匿名扱い）
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self(ANONYMOUS_USER.to_string()));
        }
        if trimmed.chars().count() > MAX_CHAT_USER_LENGTH {
            return Err(ValueObjectError::ChatUserTooLong {
                max: MAX_CHAT_USER_LENGTH,
            });
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

/// チャット本文
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatText(String);

impl ChatText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyChatText);
        }
        if trimmed.chars().count() > MAX_CHAT_TEXT_LENGTH {
            return Err(ValueObjectError::ChatTextTooLong {
                max: MAX_CHAT_TEXT_LENGTH,
            });
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

/// チャットメッセージ ID（削除キーを兼ねる、単調増加）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(i64);

impl MessageId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unix タイムスタンプ（UTC, ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

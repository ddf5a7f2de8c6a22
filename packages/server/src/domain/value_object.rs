//! Value objects.
//!
//! Identifiers are opaque UUID-style strings. They are validated only for
//! emptiness so that records produced by other services round-trip unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier, rejecting blank strings.
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                if value.trim().is_empty() {
                    return Err(ValueObjectError::EmptyIdentifier(stringify!($name)));
                }
                Ok(Self(value))
            }

            /// Generate a fresh random (v4) identifier.
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

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identifier!(
    /// User identity
    UserId
);
identifier!(
    /// Chat room identity
    RoomId
);
identifier!(
    /// Chat room membership row identity
    ParticipantId
);
identifier!(
    /// Message identity (assigned by the producer, not by this service)
    MessageId
);
identifier!(
    /// Per-receiver delivery status row identity
    MessageStatusId
);
identifier!(
    /// Socket path (connection endpoint) identity
    SocketPathId
);

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Delivery lifecycle of a message towards one receiver.
///
/// Wire codes: `1` sent, `2` delivered, `3` read. The ordering of the variants
/// is the lifecycle ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DeliveryStatus {
    Sent = 1,
    Delivered = 2,
    Read = 3,
}

impl DeliveryStatus {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self, ValueObjectError> {
        match code {
            1 => Ok(Self::Sent),
            2 => Ok(Self::Delivered),
            3 => Ok(Self::Read),
            other => Err(ValueObjectError::UnknownStatusCode(other)),
        }
    }

    /// Whether a row currently at `self` may be moved to `next`.
    ///
    /// Statuses never move backwards; re-applying the current status is allowed.
    pub fn can_advance_to(self, next: DeliveryStatus) -> bool {
        next >= self
    }
}

impl TryFrom<u8> for DeliveryStatus {
    type Error = ValueObjectError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<DeliveryStatus> for u8 {
    fn from(status: DeliveryStatus) -> Self {
        status.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_rejects_blank_value() {
        // テスト項目: 空白のみの ID は拒否される
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = UserId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyIdentifier("UserId")));
    }

    #[test]
    fn test_generated_identifiers_are_unique() {
        // テスト項目: generate() は毎回異なる ID を生成する
        // given (前提条件):
        let first = RoomId::generate();

        // when (操作):
        let second = RoomId::generate();

        // then (期待する結果):
        assert_ne!(first, second);
        assert!(Uuid::parse_str(first.as_str()).is_ok());
    }

    #[test]
    fn test_identifier_deserialization_validates() {
        // テスト項目: JSON からの復元時にも空文字チェックが行われる
        // given (前提条件):
        let valid = r#""5b0f8f57-6c1d-4a53-9c55-1f1a3c1f2b9e""#;
        let blank = r#""""#;

        // when (操作):
        let parsed: Result<MessageId, _> = serde_json::from_str(valid);
        let rejected: Result<MessageId, _> = serde_json::from_str(blank);

        // then (期待する結果):
        assert_eq!(
            parsed.unwrap().as_str(),
            "5b0f8f57-6c1d-4a53-9c55-1f1a3c1f2b9e"
        );
        assert!(rejected.is_err());
    }

    #[test]
    fn test_delivery_status_codes() {
        // テスト項目: ステータスコードと列挙値が相互に変換できる
        // given (前提条件):
        let codes = [1u8, 2, 3];

        // when (操作):
        let statuses: Vec<DeliveryStatus> = codes
            .iter()
            .map(|code| DeliveryStatus::from_code(*code).unwrap())
            .collect();

        // then (期待する結果):
        assert_eq!(
            statuses,
            vec![
                DeliveryStatus::Sent,
                DeliveryStatus::Delivered,
                DeliveryStatus::Read
            ]
        );
        assert_eq!(
            DeliveryStatus::from_code(0),
            Err(ValueObjectError::UnknownStatusCode(0))
        );
        assert_eq!(serde_json::to_string(&DeliveryStatus::Read).unwrap(), "3");
    }

    #[test]
    fn test_delivery_status_is_monotonic() {
        // テスト項目: ステータスは後退しない（同じステータスの再適用は可）
        // given (前提条件):
        let delivered = DeliveryStatus::Delivered;

        // when (操作) / then (期待する結果):
        assert!(delivered.can_advance_to(DeliveryStatus::Read));
        assert!(delivered.can_advance_to(DeliveryStatus::Delivered));
        assert!(!delivered.can_advance_to(DeliveryStatus::Sent));
    }
}

//! Identifier newtypes used as storage keys.
//!
//! Group and user identifiers are both strings on disk; wrapping them keeps a
//! group key from ever being used where a user key is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use teloxide::types::{ChatId, UserId};

/// Identifier of a group chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Telegram chat id, if this key was built from one.
    pub fn chat_id(&self) -> Option<ChatId> {
        self.0.parse::<i64>().ok().map(ChatId)
    }
}

impl From<ChatId> for GroupKey {
    fn from(id: ChatId) -> Self {
        Self(id.0.to_string())
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a user, shared across every group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserKey(String);

impl UserKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Telegram user id, if this key was built from one.
    pub fn user_id(&self) -> Option<UserId> {
        self.0.parse::<u64>().ok().map(UserId)
    }
}

impl From<UserId> for UserKey {
    fn from(id: UserId) -> Self {
        Self(id.0.to_string())
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_telegram_ids_convert_back() {
        let group = GroupKey::from(ChatId(-100123));
        assert_eq!(group.as_str(), "-100123");
        assert_eq!(group.chat_id(), Some(ChatId(-100123)));

        let user = UserKey::from(UserId(42));
        assert_eq!(user.user_id(), Some(UserId(42)));
        assert_eq!(UserKey::new("someone@c.us").user_id(), None);
    }
}

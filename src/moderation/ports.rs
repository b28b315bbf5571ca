//! Collaborator ports the moderation core calls into.
//!
//! The Telegram adapter in `bot::gateway` implements both; tests use fakes.

use async_trait::async_trait;

use crate::database::{GroupKey, UserKey};
use crate::error::RemovalError;

/// Member referenced by a notice's `@user` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub user: UserKey,
    pub name: String,
}

/// Outbound chat message.
///
/// `text` is plain text; an `@user` token in it is rendered as a mention of
/// `mention` by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub group: GroupKey,
    pub text: String,
    pub reply_to: Option<i32>,
    pub mention: Option<Mention>,
}

impl Notice {
    pub fn new(group: GroupKey, text: impl Into<String>) -> Self {
        Self {
            group,
            text: text.into(),
            reply_to: None,
            mention: None,
        }
    }

    #[must_use]
    pub fn reply_to(mut self, message_id: Option<i32>) -> Self {
        self.reply_to = message_id;
        self
    }

    #[must_use]
    pub fn mention(mut self, user: UserKey, name: impl Into<String>) -> Self {
        self.mention = Some(Mention {
            user,
            name: name.into(),
        });
        self
    }
}

/// Removes members from groups. No retries.
#[async_trait]
pub trait Membership: Send + Sync {
    async fn remove_from_group(&self, group: &GroupKey, user: &UserKey) -> Result<(), RemovalError>;
}

/// Sends replies into chats. Callers log failures and move on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: Notice) -> anyhow::Result<()>;
}

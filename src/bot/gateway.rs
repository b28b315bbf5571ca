//! Telegram adapter for the moderation ports.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode, ReplyParameters};
use tracing::warn;

use super::dispatcher::ThrottledBot;
use crate::database::{GroupKey, UserKey};
use crate::error::RemovalError;
use crate::moderation::{Membership, Notice, Notifier};
use crate::utils::render_template;

/// Carries out engine actions through the Bot API.
#[derive(Clone)]
pub struct TelegramGateway {
    bot: ThrottledBot,
}

impl TelegramGateway {
    pub fn new(bot: ThrottledBot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Membership for TelegramGateway {
    /// Kick: ban, then unban so the user may rejoin later.
    async fn remove_from_group(&self, group: &GroupKey, user: &UserKey) -> Result<(), RemovalError> {
        let chat_id = group
            .chat_id()
            .ok_or_else(|| RemovalError::InvalidTarget(format!("group {}", group)))?;
        let user_id = user
            .user_id()
            .ok_or_else(|| RemovalError::InvalidTarget(format!("user {}", user)))?;

        self.bot
            .ban_chat_member(chat_id, user_id)
            .await
            .map_err(|e| RemovalError::Rejected(e.to_string()))?;

        if let Err(e) = self
            .bot
            .unban_chat_member(chat_id, user_id)
            .only_if_banned(true)
            .await
        {
            warn!("Kicked {} from {} but unban failed: {}", user, group, e);
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramGateway {
    async fn notify(&self, notice: Notice) -> anyhow::Result<()> {
        let chat_id = notice
            .group
            .chat_id()
            .ok_or_else(|| anyhow::anyhow!("not a telegram chat: {}", notice.group))?;

        let mention = notice
            .mention
            .as_ref()
            .and_then(|m| m.user.user_id().map(|id| (id, m.name.as_str())));
        let html = render_template(&notice.text, mention);

        let mut request = self.bot.send_message(chat_id, html).parse_mode(ParseMode::Html);
        if let Some(id) = notice.reply_to {
            request = request
                .reply_parameters(ReplyParameters::new(MessageId(id)).allow_sending_without_reply());
        }
        request.await?;

        Ok(())
    }
}

//! Welcome event handler.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::ChatMemberUpdated;
use tracing::info;

use super::send_template;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::Template;

/// Returns the handler for new member events.
pub fn handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(is_new_member).endpoint(welcome_handler)
}

/// A non-bot user who was not a member before and is now.
fn is_new_member(update: ChatMemberUpdated) -> bool {
    let old = &update.old_chat_member;
    let new = &update.new_chat_member;

    !old.is_present() && new.is_present() && !new.user.is_bot
}

async fn welcome_handler(
    bot: ThrottledBot,
    update: ChatMemberUpdated,
    state: AppState,
) -> anyhow::Result<()> {
    let user = &update.new_chat_member.user;

    send_template(&bot, &state, update.chat.id, user, Template::Welcome).await?;
    info!("Welcomed {} in chat {}", user.id, update.chat.id);

    Ok(())
}

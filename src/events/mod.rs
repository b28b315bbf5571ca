//! Event handler system.
//!
//! Membership events (join/leave/kick) send the group's templates; ordinary
//! group messages are fed to the moderation engine.

pub mod bye;
pub mod moderation;
pub mod welcome;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode, User};
use tracing::debug;

use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{GroupKey, Template};
use crate::utils::render_template;

/// Build the combined event handler for chat member updates.
pub fn event_handler() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(welcome::handler())
        .branch(bye::handler())
}

/// Build the message event handler.
pub fn message_event_handler() -> UpdateHandler<anyhow::Error> {
    moderation::handler()
}

/// Send one of the group's membership templates, mentioning `user`.
async fn send_template(
    bot: &ThrottledBot,
    state: &AppState,
    chat_id: ChatId,
    user: &User,
    template: Template,
) -> anyhow::Result<()> {
    let settings = state.settings.get(&GroupKey::from(chat_id)).await;
    let text = render_template(
        settings.template(template),
        Some((user.id, &user.first_name)),
    );

    debug!("Sending {} message for {} in {}", template.label(), user.id, chat_id);
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await?;

    Ok(())
}

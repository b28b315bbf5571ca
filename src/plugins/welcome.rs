//! Membership template commands: /setwelcome, /setgoodbye, /setleft.

use teloxide::prelude::*;
use tracing::info;

use super::{ensure_group_admin, reply};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{GroupKey, Template};

pub async fn setwelcome_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    text: String,
) -> anyhow::Result<()> {
    set_template(bot, msg, state, Template::Welcome, text).await
}

pub async fn setgoodbye_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    text: String,
) -> anyhow::Result<()> {
    set_template(bot, msg, state, Template::Goodbye, text).await
}

pub async fn setleft_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    text: String,
) -> anyhow::Result<()> {
    set_template(bot, msg, state, Template::Left, text).await
}

async fn set_template(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    template: Template,
    text: String,
) -> anyhow::Result<()> {
    if !ensure_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let text = text.trim();
    if text.is_empty() {
        let usage = format!(
            "❌ Usage: /set{} [message]. Use @user to mention the member.",
            template.label().to_lowercase()
        );
        return reply(&bot, &msg, usage).await;
    }

    let group = GroupKey::from(msg.chat.id);
    let response = match state.settings.set_template(&group, template, text).await {
        Ok(()) => {
            info!("{} message updated in {}", template.label(), group);
            format!("✅ {} message updated for this group!", template.label())
        }
        Err(e) => format!(
            "⚠️ {} message updated, but saving failed: {}",
            template.label(),
            e
        ),
    };
    reply(&bot, &msg, response).await
}

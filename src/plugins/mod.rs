//! Plugin system for command handlers.
//!
//! Add new plugins by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_plugin;` below
//! 3. Adding the handler to `command_handler()`

pub mod help;
pub mod offenses;
pub mod remove;
pub mod welcome;
pub mod words;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::ReplyParameters;
use teloxide::utils::command::BotCommands;
use tracing::warn;

use crate::bot::dispatcher::{AppState, ThrottledBot};

pub const NOT_ADMIN_TEXT: &str =
    "❌ This command is only available to group admins or the bot owner.";
pub const GROUP_ONLY_TEXT: &str = "❌ This command only works in groups.";

/// All bot commands.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Show all commands")]
    Help,

    #[command(description = "Show your permission status")]
    Test,

    // Forbidden words
    #[command(description = "Add a forbidden word")]
    Addword(String),

    #[command(description = "Remove a forbidden word")]
    Removeword(String),

    #[command(description = "List forbidden words")]
    Listwords,

    #[command(description = "Show group settings")]
    Groupinfo,

    // Membership templates
    #[command(description = "Set welcome message")]
    Setwelcome(String),

    #[command(description = "Set goodbye message")]
    Setgoodbye(String),

    #[command(description = "Set left message")]
    Setleft(String),

    // Members and offenses
    #[command(description = "Remove a user from the group")]
    Remove(String),

    #[command(description = "Check a user's offenses")]
    Checkoffenses(String),

    #[command(description = "Reset a user's offenses")]
    Resetoffenses(String),
}

/// Build the combined command handler.
pub fn command_handler() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    teloxide::filter_command::<Command, _>()
        .branch(case![Command::Help].endpoint(help::help_command))
        .branch(case![Command::Test].endpoint(help::test_command))
        // Forbidden words
        .branch(case![Command::Addword(word)].endpoint(words::addword_command))
        .branch(case![Command::Removeword(word)].endpoint(words::removeword_command))
        .branch(case![Command::Listwords].endpoint(words::listwords_command))
        .branch(case![Command::Groupinfo].endpoint(words::groupinfo_command))
        // Templates
        .branch(case![Command::Setwelcome(text)].endpoint(welcome::setwelcome_command))
        .branch(case![Command::Setgoodbye(text)].endpoint(welcome::setgoodbye_command))
        .branch(case![Command::Setleft(text)].endpoint(welcome::setleft_command))
        // Members and offenses
        .branch(case![Command::Remove(args)].endpoint(remove::remove_command))
        .branch(case![Command::Checkoffenses(args)].endpoint(offenses::checkoffenses_command))
        .branch(case![Command::Resetoffenses(args)].endpoint(offenses::resetoffenses_command))
}

/// Plain-text reply to a command message.
pub(crate) async fn reply(bot: &ThrottledBot, msg: &Message, text: impl Into<String>) -> anyhow::Result<()> {
    bot.send_message(msg.chat.id, text)
        .reply_parameters(ReplyParameters::new(msg.id))
        .await?;
    Ok(())
}

pub(crate) fn is_group(msg: &Message) -> bool {
    msg.chat.is_group() || msg.chat.is_supergroup()
}

/// Gate for admin commands: the sender must be a bot owner, or an admin of
/// this chat. Replies with the refusal and returns `false` otherwise.
pub(crate) async fn ensure_admin(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<bool> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(false);
    };

    let allowed = if state.permissions.is_bot_owner(user.id) {
        true
    } else if is_group(msg) {
        state
            .permissions
            .is_admin(msg.chat.id, user.id)
            .await
            .unwrap_or_else(|e| {
                warn!("Admin lookup failed for {} in {}: {}", user.id, msg.chat.id, e);
                false
            })
    } else {
        false
    };

    if !allowed {
        reply(bot, msg, NOT_ADMIN_TEXT).await?;
    }
    Ok(allowed)
}

/// Admin gate plus group-only check, in that order.
pub(crate) async fn ensure_group_admin(
    bot: &ThrottledBot,
    msg: &Message,
    state: &AppState,
) -> anyhow::Result<bool> {
    if !ensure_admin(bot, msg, state).await? {
        return Ok(false);
    }
    if !is_group(msg) {
        reply(bot, msg, GROUP_ONLY_TEXT).await?;
        return Ok(false);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("/addword Bingwa Sokoni", "aegis_bot").unwrap(),
            Command::Addword("Bingwa Sokoni".to_string())
        );
        assert_eq!(
            Command::parse("/listwords", "aegis_bot").unwrap(),
            Command::Listwords
        );
        assert_eq!(
            Command::parse("/checkoffenses@aegis_bot 42", "aegis_bot").unwrap(),
            Command::Checkoffenses("42".to_string())
        );
    }
}

//! Target resolution for user commands.
//!
//! `/remove`, `/checkoffenses` and `/resetoffenses` act on a user picked by
//! reply, numeric id, text mention or @username.

use teloxide::prelude::*;
use teloxide::types::{Message, MessageEntityKind, UserId};

use crate::bot::dispatcher::ThrottledBot;

/// A resolved command target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: UserId,
    pub name: String,
}

/// Resolve the target user of a command.
///
/// Resolution order:
/// 1. Reply message → `reply.from`
/// 2. Numeric argument → user id
/// 3. TextMention entity → mentioned user
/// 4. @username → `get_chat`
pub async fn get_target_from_msg(bot: &ThrottledBot, msg: &Message) -> Option<Target> {
    if let Some(reply) = msg.reply_to_message()
        && let Some(user) = &reply.from
    {
        return Some(Target {
            id: user.id,
            name: user.first_name.clone(),
        });
    }

    let arg = msg.text()?.split_whitespace().nth(1)?;

    if let Some(id) = parse_user_id(arg) {
        return Some(Target {
            id,
            name: format!("User {}", id),
        });
    }

    if let Some(entities) = msg.entities() {
        for entity in entities {
            if let MessageEntityKind::TextMention { user } = &entity.kind {
                return Some(Target {
                    id: user.id,
                    name: user.first_name.clone(),
                });
            }
        }
    }

    if arg.starts_with('@')
        && let Ok(chat) = bot.get_chat(arg.to_string()).await
        && chat.is_private()
        && let Ok(id) = u64::try_from(chat.id.0)
    {
        let name = chat.first_name().unwrap_or("User").to_string();
        return Some(Target {
            id: UserId(id),
            name,
        });
    }

    None
}

fn parse_user_id(arg: &str) -> Option<UserId> {
    arg.parse::<u64>().ok().map(UserId)
}

//! Goodbye event handler.
//!
//! A member who leaves on their own gets the "left" template; one removed by
//! an admin or the bot gets the "goodbye" template.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{ChatMemberUpdated, UserId};
use tracing::info;

use super::send_template;
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::Template;

/// Returns the handler for member leave events.
pub fn handler() -> UpdateHandler<anyhow::Error> {
    dptree::filter(is_member_left).endpoint(bye_handler)
}

/// A non-bot user who was a member before and is no longer.
fn is_member_left(update: ChatMemberUpdated) -> bool {
    let old = &update.old_chat_member;
    let new = &update.new_chat_member;

    old.is_present() && !new.is_present() && !old.user.is_bot
}

/// Pick the template from who performed the change.
fn departure_template(actor: UserId, member: UserId) -> Template {
    if actor == member {
        Template::Left
    } else {
        Template::Goodbye
    }
}

async fn bye_handler(
    bot: ThrottledBot,
    update: ChatMemberUpdated,
    state: AppState,
) -> anyhow::Result<()> {
    let user = &update.old_chat_member.user;
    let template = departure_template(update.from.id, user.id);

    // Admin status of a departed member is stale
    state.permissions.invalidate(update.chat.id, user.id);

    send_template(&bot, &state, update.chat.id, user, template).await?;
    info!(
        "Sent {} message for {} in chat {}",
        template.label(),
        user.id,
        update.chat.id
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_departure_template() {
        assert_eq!(departure_template(UserId(5), UserId(5)), Template::Left);
        assert_eq!(departure_template(UserId(1), UserId(5)), Template::Goodbye);
    }
}

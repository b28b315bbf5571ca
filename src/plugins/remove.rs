//! /remove: kick a member on an admin's request.

use teloxide::prelude::*;
use tracing::{info, warn};

use super::{ensure_group_admin, reply};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{GroupKey, UserKey};
use crate::error::RemovalError;
use crate::utils::target::get_target_from_msg;

/// Handle /remove <target>. Goes through the same membership port as the
/// engine, so the user may rejoin afterwards.
pub async fn remove_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    if !ensure_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some(target) = get_target_from_msg(&bot, &msg).await else {
        return reply(&bot, &msg, "❌ Reply to a user or give their user id.").await;
    };

    let group = GroupKey::from(msg.chat.id);
    let user = UserKey::from(target.id);
    let result = state.membership.remove_from_group(&group, &user).await;
    match &result {
        Ok(()) => info!("Admin removed {} from {}", user, group),
        Err(e) => warn!("Failed to remove {} from {}: {}", user, group, e),
    }

    reply(&bot, &msg, removal_reply(&result)).await
}

fn removal_reply(result: &Result<(), RemovalError>) -> &'static str {
    match result {
        Ok(()) => "🚫 User removed by admin.",
        Err(_) => "❌ Failed to remove user. Make sure I have admin permissions.",
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_removal_reply() {
        assert_eq!(removal_reply(&Ok(())), "🚫 User removed by admin.");

        let failures = [
            RemovalError::Rejected("not enough rights".into()),
            RemovalError::Timeout(Duration::from_secs(15)),
            RemovalError::InvalidTarget("abc".into()),
        ];
        for e in failures {
            assert_eq!(
                removal_reply(&Err(e)),
                "❌ Failed to remove user. Make sure I have admin permissions."
            );
        }
    }
}

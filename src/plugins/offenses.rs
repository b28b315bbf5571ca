//! Offense inspection: /checkoffenses and /resetoffenses.

use teloxide::prelude::*;
use tracing::info;

use super::{ensure_admin, reply};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{UserKey, now_millis};
use crate::utils::target::get_target_from_msg;

const NO_TARGET_TEXT: &str = "❌ Reply to a user or give their user id.";

/// Handle /checkoffenses <target>.
pub async fn checkoffenses_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    if !ensure_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some(target) = get_target_from_msg(&bot, &msg).await else {
        return reply(&bot, &msg, NO_TARGET_TEXT).await;
    };

    let count = state
        .offenses
        .offense_count(&UserKey::from(target.id), now_millis());
    reply(&bot, &msg, offense_count_text(count)).await
}

/// Handle /resetoffenses <target>.
pub async fn resetoffenses_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
) -> anyhow::Result<()> {
    if !ensure_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let Some(target) = get_target_from_msg(&bot, &msg).await else {
        return reply(&bot, &msg, NO_TARGET_TEXT).await;
    };

    let user = UserKey::from(target.id);
    let text = match state.offenses.reset(&user).await.into_result() {
        Ok(_) => {
            info!("Offenses reset for {} by admin", user);
            "✅ User offenses reset to 0.".to_string()
        }
        Err(e) => format!("⚠️ User offenses reset to 0, but saving failed: {}", e),
    };
    reply(&bot, &msg, text).await
}

fn offense_count_text(count: usize) -> String {
    format!("⚠️ User has {} offense(s) in the last 6 hours.", count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offense_count_text() {
        assert_eq!(
            offense_count_text(2),
            "⚠️ User has 2 offense(s) in the last 6 hours."
        );
    }
}

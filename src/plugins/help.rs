//! /help and /test commands.

use teloxide::prelude::*;

use super::{is_group, reply};
use crate::bot::dispatcher::{AppState, ThrottledBot};

const HELP_TEXT: &str = "📱 BOT COMMANDS

👑 ADMIN COMMANDS (Group Only):
• /addword [word] - Add bad word
• /removeword [word] - Remove bad word
• /listwords - Show bad words
• /remove [user] - Remove user
• /setwelcome [msg] - Set welcome message
• /setgoodbye [msg] - Set goodbye message
• /setleft [msg] - Set left message
• /checkoffenses [user] - Check offenses
• /resetoffenses [user] - Reset offenses
• /groupinfo - Show group settings

Use @user in a template to mention the member.
A user is given by reply, user id or mention.

⚙️ OWNER ONLY (Anywhere):
• All admin commands work everywhere

🛡️ Moderation: 1st bad word is noted, 2nd gets a warning, \
3rd within 6 hours removes the user.";

pub async fn help_command(bot: ThrottledBot, msg: Message) -> anyhow::Result<()> {
    reply(&bot, &msg, HELP_TEXT).await
}

/// Report the caller's permission status.
pub async fn test_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let in_group = is_group(&msg);
    let is_owner = state.permissions.is_bot_owner(user.id);
    let is_admin = is_owner
        || (in_group
            && state
                .permissions
                .is_admin(msg.chat.id, user.id)
                .await
                .unwrap_or(false));

    reply(&bot, &msg, permission_report(user.id.0, is_owner, is_admin, in_group)).await
}

fn permission_report(user_id: u64, is_owner: bool, is_admin: bool, in_group: bool) -> String {
    let yes_no = |flag: bool| if flag { "✅ YES" } else { "❌ NO" };
    format!(
        "🔍 Permission Test\n\n\
         🆔 Your user id: {}\n\
         👑 Owner status: {}\n\
         👑 Admin status: {}\n\
         💬 Group chat: {}",
        user_id,
        yes_no(is_owner),
        yes_no(is_admin),
        yes_no(in_group)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_report() {
        let report = permission_report(42, false, true, true);
        assert!(report.contains("Your user id: 42"));
        assert!(report.contains("Owner status: ❌ NO"));
        assert!(report.contains("Admin status: ✅ YES"));
        assert!(report.contains("Group chat: ✅ YES"));
    }
}

//! Forbidden word management and the group settings summary.

use teloxide::prelude::*;
use tracing::info;

use super::{ensure_group_admin, reply};
use crate::bot::dispatcher::{AppState, ThrottledBot};
use crate::database::{GroupKey, GroupSettings, Template};

/// Handle /addword <word>.
pub async fn addword_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    word: String,
) -> anyhow::Result<()> {
    if !ensure_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let word = word.trim().to_lowercase();
    if word.is_empty() {
        return reply(&bot, &msg, "❌ Usage: /addword [word]").await;
    }

    let group = GroupKey::from(msg.chat.id);
    let text = match state.settings.add_word(&group, &word).await {
        Ok(true) => {
            info!("Added forbidden word {:?} in {}", word, group);
            format!("✅ Added \"{}\" to this group's forbidden words list.", word)
        }
        Ok(false) => format!("ℹ️ \"{}\" is already in this group's forbidden words list.", word),
        Err(e) => format!("⚠️ Added \"{}\", but saving failed: {}", word, e),
    };
    reply(&bot, &msg, text).await
}

/// Handle /removeword <word>.
pub async fn removeword_command(
    bot: ThrottledBot,
    msg: Message,
    state: AppState,
    word: String,
) -> anyhow::Result<()> {
    if !ensure_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let word = word.trim().to_lowercase();
    if word.is_empty() {
        return reply(&bot, &msg, "❌ Usage: /removeword [word]").await;
    }

    let group = GroupKey::from(msg.chat.id);
    let text = match state.settings.remove_word(&group, &word).await {
        Ok(true) => {
            info!("Removed forbidden word {:?} in {}", word, group);
            format!("✅ Removed \"{}\" from this group's forbidden words list.", word)
        }
        Ok(false) => format!("❌ \"{}\" not found in this group's forbidden words list.", word),
        Err(e) => format!("⚠️ Removed \"{}\", but saving failed: {}", word, e),
    };
    reply(&bot, &msg, text).await
}

/// Handle /listwords.
pub async fn listwords_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    if !ensure_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let settings = state.settings.get(&GroupKey::from(msg.chat.id)).await;
    reply(&bot, &msg, word_list(&settings)).await
}

/// Handle /groupinfo.
pub async fn groupinfo_command(bot: ThrottledBot, msg: Message, state: AppState) -> anyhow::Result<()> {
    if !ensure_group_admin(&bot, &msg, &state).await? {
        return Ok(());
    }

    let settings = state.settings.get(&GroupKey::from(msg.chat.id)).await;
    reply(&bot, &msg, group_info(&settings)).await
}

fn word_list(settings: &GroupSettings) -> String {
    if settings.forbidden_words.is_empty() {
        return "📝 No forbidden words set for this group.".to_string();
    }

    let lines: Vec<String> = settings
        .forbidden_words
        .iter()
        .map(|word| format!("• {}", word))
        .collect();
    format!("📝 This group's forbidden words:\n{}", lines.join("\n"))
}

fn group_info(settings: &GroupSettings) -> String {
    format!(
        "🏷️ Group Settings\n\n\
         📝 Bad Words: {} words\n\
         💬 Welcome: {}\n\
         👋 Goodbye: {}\n\
         🚪 Left: {}\n\n\
         Use /listwords to see all forbidden words",
        settings.forbidden_words.len(),
        preview(settings.template(Template::Welcome)),
        preview(settings.template(Template::Goodbye)),
        preview(settings.template(Template::Left)),
    )
}

/// First 50 characters of a template.
fn preview(text: &str) -> String {
    const LIMIT: usize = 50;
    if text.chars().count() <= LIMIT {
        return text.to_string();
    }
    let head: String = text.chars().take(LIMIT).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_list() {
        let settings = GroupSettings::with_words(["spam", "scam"]);
        assert_eq!(
            word_list(&settings),
            "📝 This group's forbidden words:\n• scam\n• spam"
        );

        let empty = GroupSettings::with_words(Vec::<String>::new());
        assert_eq!(word_list(&empty), "📝 No forbidden words set for this group.");
    }

    #[test]
    fn test_group_info_truncates_templates() {
        let mut settings = GroupSettings::with_words(["spam"]);
        settings.set_template(Template::Welcome, "x".repeat(80));

        let info = group_info(&settings);
        assert!(info.contains("Bad Words: 1 words"));
        assert!(info.contains(&format!("Welcome: {}...", "x".repeat(50))));
    }

    #[test]
    fn test_preview_is_char_safe() {
        let text = "🎉".repeat(60);
        assert_eq!(preview(&text).chars().count(), 53);
        assert_eq!(preview("short"), "short");
    }
}

//! Utility functions.
//!
//! HTML helpers for outgoing messages and target resolution for commands.

pub mod target;

use teloxide::types::UserId;

use crate::database::USER_PLACEHOLDER;

/// Escape text for Telegram's HTML parse mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// HTML link that mentions a user by id, shown as `name`.
pub fn mention_html(user_id: UserId, name: &str) -> String {
    format!(
        "<a href=\"tg://user?id={}\">{}</a>",
        user_id.0,
        html_escape(name)
    )
}

/// Render plain `text` as HTML, replacing every `@user` with `mention`.
///
/// With no mention the placeholder is left as plain text.
pub fn render_template(text: &str, mention: Option<(UserId, &str)>) -> String {
    let escaped = html_escape(text);
    match mention {
        Some((user_id, name)) => escaped.replace(USER_PLACEHOLDER, &mention_html(user_id, name)),
        None => escaped,
    }
}

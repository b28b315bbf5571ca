//! Group settings model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Token in a template that is replaced with a mention of the member.
pub const USER_PLACEHOLDER: &str = "@user";

pub const DEFAULT_WELCOME: &str = "🎉 Welcome @user to the group! Feel free to introduce yourself.";
pub const DEFAULT_GOODBYE: &str = "👋 @user has left the group. We'll miss you!";
pub const DEFAULT_LEFT: &str = "👋 @user has left the group. See you next time!";

/// Membership message templates a group can customize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Sent when a member joins.
    Welcome,
    /// Sent when a member is removed by someone else.
    Goodbye,
    /// Sent when a member leaves on their own.
    Left,
}

impl Template {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::Goodbye => "Goodbye",
            Self::Left => "Left",
        }
    }
}

/// Per-group configuration, one entry per group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSettings {
    /// Lowercase forbidden words
    #[serde(default)]
    pub forbidden_words: BTreeSet<String>,

    #[serde(default = "default_welcome")]
    pub welcome: String,

    #[serde(default = "default_goodbye")]
    pub goodbye: String,

    #[serde(default = "default_left")]
    pub left: String,
}

fn default_welcome() -> String {
    DEFAULT_WELCOME.to_string()
}

fn default_goodbye() -> String {
    DEFAULT_GOODBYE.to_string()
}

fn default_left() -> String {
    DEFAULT_LEFT.to_string()
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            forbidden_words: BTreeSet::new(),
            welcome: default_welcome(),
            goodbye: default_goodbye(),
            left: default_left(),
        }
    }
}

impl GroupSettings {
    /// Default settings seeded with the given forbidden words.
    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            forbidden_words: words
                .into_iter()
                .filter_map(|w| normalize_word(w.as_ref()))
                .collect(),
            ..Default::default()
        }
    }

    /// Lowercase hand-edited words and drop blank ones.
    pub fn normalize(&mut self) {
        let words = std::mem::take(&mut self.forbidden_words);
        self.forbidden_words = words.iter().filter_map(|w| normalize_word(w)).collect();
    }

    /// Add a forbidden word. Returns `false` if it was blank or already present.
    pub fn add_word(&mut self, word: &str) -> bool {
        match normalize_word(word) {
            Some(word) => self.forbidden_words.insert(word),
            None => false,
        }
    }

    /// Remove a forbidden word. Returns `false` if it was not present.
    pub fn remove_word(&mut self, word: &str) -> bool {
        match normalize_word(word) {
            Some(word) => self.forbidden_words.remove(&word),
            None => false,
        }
    }

    /// First forbidden word contained anywhere in `body`, ignoring case.
    ///
    /// This is a plain substring test: "class" matches a forbidden "ass".
    pub fn matched_word(&self, body: &str) -> Option<&str> {
        let body = body.to_lowercase();
        self.forbidden_words
            .iter()
            .find(|word| body.contains(word.as_str()))
            .map(String::as_str)
    }

    pub fn is_violation(&self, body: &str) -> bool {
        self.matched_word(body).is_some()
    }

    pub fn template(&self, template: Template) -> &str {
        match template {
            Template::Welcome => &self.welcome,
            Template::Goodbye => &self.goodbye,
            Template::Left => &self.left,
        }
    }

    pub fn set_template(&mut self, template: Template, text: impl Into<String>) {
        let text = text.into();
        match template {
            Template::Welcome => self.welcome = text,
            Template::Goodbye => self.goodbye = text,
            Template::Left => self.left = text,
        }
    }
}

fn normalize_word(word: &str) -> Option<String> {
    let word = word.trim().to_lowercase();
    if word.is_empty() { None } else { Some(word) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_is_case_insensitive() {
        let settings = GroupSettings::with_words(["bingwa"]);
        assert!(settings.is_violation("Join BINGWA today"));
        assert!(!settings.is_violation("hello there"));
    }

    #[test]
    fn test_match_is_substring_not_word_boundary() {
        // Documented behavior: words embedded in longer words still match.
        let settings = GroupSettings::with_words(["ass"]);
        assert_eq!(settings.matched_word("first class ticket"), Some("ass"));
    }

    #[test]
    fn test_multi_word_entries_match() {
        let settings = GroupSettings::with_words(["bingwa sokoni"]);
        assert!(settings.is_violation("try Bingwa Sokoni deals"));
        assert!(!settings.is_violation("sokoni bingwa"));
    }

    #[test]
    fn test_add_and_remove_words() {
        let mut settings = GroupSettings::default();
        assert!(settings.add_word("  Spam "));
        assert!(!settings.add_word("spam"));
        assert!(!settings.add_word("   "));
        assert_eq!(settings.forbidden_words.len(), 1);

        assert!(settings.remove_word("SPAM"));
        assert!(!settings.remove_word("spam"));
    }

    #[test]
    fn test_hand_edited_file_is_normalized() {
        let raw = r#"{"forbiddenWords": ["Spam", "", "spam"], "welcome": "hi @user"}"#;
        let mut settings: GroupSettings = serde_json::from_str(raw).unwrap();
        settings.normalize();

        assert_eq!(settings.forbidden_words.len(), 1);
        assert!(settings.forbidden_words.contains("spam"));
        assert_eq!(settings.template(Template::Welcome), "hi @user");
        assert_eq!(settings.template(Template::Left), DEFAULT_LEFT);
    }
}

//! Group settings repository.
//!
//! All groups live in memory and in one JSON document. Every mutation
//! rewrites the document before returning.

use std::collections::BTreeMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::database::json_store::{Flushed, JsonFile};
use crate::database::models::{GroupKey, GroupSettings, Template};
use crate::error::StoreError;

type SettingsMap = BTreeMap<GroupKey, GroupSettings>;

/// Repository for per-group settings.
pub struct SettingsRepository {
    groups: RwLock<SettingsMap>,
    default_words: Vec<String>,
    file: JsonFile,
}

impl SettingsRepository {
    /// Load settings from `path`. New groups are seeded with `default_words`.
    pub async fn open(path: impl Into<PathBuf>, default_words: Vec<String>) -> Self {
        let file = JsonFile::new(path);
        let mut groups: SettingsMap = file.load().await;
        for settings in groups.values_mut() {
            settings.normalize();
        }
        info!(
            "Loaded settings for {} groups from {}",
            groups.len(),
            file.path().display()
        );

        Self {
            groups: RwLock::new(groups),
            default_words,
            file,
        }
    }

    /// Get a group's settings, creating and persisting defaults on first use.
    ///
    /// A failed write of fresh defaults is logged, not returned.
    pub async fn get(&self, group: &GroupKey) -> GroupSettings {
        if let Some(settings) = self.groups.read().get(group) {
            return settings.clone();
        }

        debug!("Creating default settings for group {}", group);
        self.commit(group, |settings| settings.clone())
            .await
            .logged("default group settings")
    }

    /// Apply `mutator` to a group's settings and persist.
    ///
    /// The change stays in memory even when the write fails.
    pub async fn update<T, F>(&self, group: &GroupKey, mutator: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut GroupSettings) -> T + Send,
        T: Send,
    {
        self.commit(group, mutator).await.into_result()
    }

    /// Whether `body` contains one of the group's forbidden words.
    pub async fn is_violation(&self, group: &GroupKey, body: &str) -> bool {
        self.get(group).await.is_violation(body)
    }

    /// Add a forbidden word. `Ok(false)` if it was already listed.
    pub async fn add_word(&self, group: &GroupKey, word: &str) -> Result<bool, StoreError> {
        self.update(group, |settings| settings.add_word(word)).await
    }

    /// Remove a forbidden word. `Ok(false)` if it was not listed.
    pub async fn remove_word(&self, group: &GroupKey, word: &str) -> Result<bool, StoreError> {
        self.update(group, |settings| settings.remove_word(word)).await
    }

    pub async fn set_template(
        &self,
        group: &GroupKey,
        template: Template,
        text: &str,
    ) -> Result<(), StoreError> {
        self.update(group, |settings| settings.set_template(template, text))
            .await
    }

    async fn commit<T, F>(&self, group: &GroupKey, mutator: F) -> Flushed<T>
    where
        F: FnOnce(&mut GroupSettings) -> T + Send,
        T: Send,
    {
        let _turn = self.file.writer().await;

        let (value, snapshot) = {
            let mut groups = self.groups.write();
            let settings = groups
                .entry(group.clone())
                .or_insert_with(|| GroupSettings::with_words(&self.default_words));
            let value = mutator(settings);
            (value, serde_json::to_vec_pretty(&*groups))
        };

        let flush = match snapshot {
            Ok(bytes) => self.file.write(&bytes).await,
            Err(e) => Err(e.into()),
        };
        Flushed::new(value, flush)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Vec<String> {
        vec!["bingwa".to_string()]
    }

    #[tokio::test]
    async fn test_get_creates_and_persists_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("group-settings.json");
        let repo = SettingsRepository::open(&path, defaults()).await;
        let group = GroupKey::new("-1001");

        let settings = repo.get(&group).await;
        assert!(settings.forbidden_words.contains("bingwa"));

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["-1001"]["forbiddenWords"][0], "bingwa");
        assert!(raw["-1001"]["welcome"].as_str().unwrap().contains("@user"));
    }

    #[tokio::test]
    async fn test_updates_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("group-settings.json");
        let group = GroupKey::new("-1001");

        {
            let repo = SettingsRepository::open(&path, defaults()).await;
            assert!(repo.add_word(&group, "Scam").await.unwrap());
            assert!(!repo.add_word(&group, "scam").await.unwrap());
            assert!(repo.remove_word(&group, "bingwa").await.unwrap());
            repo.set_template(&group, Template::Left, "bye @user")
                .await
                .unwrap();
        }

        let repo = SettingsRepository::open(&path, defaults()).await;
        let settings = repo.get(&group).await;
        assert_eq!(settings.forbidden_words.len(), 1);
        assert!(repo.is_violation(&group, "free SCAM inside").await);
        assert!(!repo.is_violation(&group, "bingwa").await);
        assert_eq!(settings.template(Template::Left), "bye @user");
    }

    #[tokio::test]
    async fn test_groups_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SettingsRepository::open(dir.path().join("s.json"), defaults()).await;
        let a = GroupKey::new("a");
        let b = GroupKey::new("b");

        repo.add_word(&a, "only-in-a").await.unwrap();
        assert!(repo.is_violation(&a, "only-in-a").await);
        assert!(!repo.is_violation(&b, "only-in-a").await);
    }

    #[tokio::test]
    async fn test_failed_write_is_surfaced_but_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("s.json");
        let repo = SettingsRepository::open(&path, defaults()).await;
        let group = GroupKey::new("g");

        let result = repo.add_word(&group, "spam").await;
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(repo.is_violation(&group, "spam").await);
    }
}

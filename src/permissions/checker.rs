//! Permission checker with caching.

use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatMemberKind, UserId};
use tracing::debug;

use crate::cache::{CacheConfig, TypedCache};

/// Cache key for admin lookups.
type AdminCacheKey = (i64, u64); // (chat_id, user_id)

/// Admin checks for command gating.
///
/// Bot owners (from OWNER_IDS env) pass every check in every chat.
#[derive(Clone)]
pub struct Permissions {
    bot: Bot,
    cache: TypedCache<AdminCacheKey, bool>,
    owner_ids: Vec<u64>,
}

impl Permissions {
    pub fn with_owners(bot: Bot, owner_ids: Vec<u64>) -> Self {
        Self {
            bot,
            cache: TypedCache::new("admin_status", CacheConfig::admin_status()),
            owner_ids,
        }
    }

    #[inline]
    pub fn is_bot_owner(&self, user_id: UserId) -> bool {
        is_listed_owner(&self.owner_ids, user_id)
    }

    /// Whether the user is the group's creator or an administrator.
    /// Bot owners always return true.
    pub async fn is_admin(&self, chat_id: ChatId, user_id: UserId) -> anyhow::Result<bool> {
        if self.is_bot_owner(user_id) {
            debug!("User {} is bot owner, granting admin", user_id);
            return Ok(true);
        }

        let cache_key = (chat_id.0, user_id.0);
        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("Admin cache hit for user {} in chat {}", user_id, chat_id);
            return Ok(cached);
        }

        let member = self.bot.get_chat_member(chat_id, user_id).await?;
        let is_admin = matches!(
            member.kind,
            ChatMemberKind::Owner(_) | ChatMemberKind::Administrator(_)
        );

        // Non-admins are cached too
        self.cache.insert(cache_key, is_admin);
        Ok(is_admin)
    }

    /// Drop cached admin status for a user, e.g. after a membership change.
    pub fn invalidate(&self, chat_id: ChatId, user_id: UserId) {
        self.cache.invalidate(&(chat_id.0, user_id.0));
        debug!(
            "Invalidated admin cache for user {} in chat {}",
            user_id, chat_id
        );
    }
}

fn is_listed_owner(owner_ids: &[u64], user_id: UserId) -> bool {
    owner_ids.contains(&user_id.0)
}

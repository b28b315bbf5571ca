//! Moderation engine.
//!
//! Classifies a group message against the group's forbidden words, records
//! the violation and picks the action for the resulting count:
//!
//! | count | action |
//! |---|---|
//! | 1 | none, logged |
//! | 2 | warning reply |
//! | 3+ | removal attempt, record cleared |

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::ports::{Membership, Notice, Notifier};
use crate::database::{
    GroupKey, OffenseRepository, SettingsRepository, UserKey, WARN_THRESHOLD, now_millis,
};
use crate::error::RemovalError;

pub const WARNING_TEXT: &str = "⚠️ First Warning! Please avoid using inappropriate language. \
     Next violation within 6 hours will result in removal.";
pub const REMOVED_TEXT: &str =
    "🚫 User @user has been removed for multiple violations within 6 hours.";
pub const REMOVAL_FAILED_TEXT: &str = "❌ I need admin privileges to remove users.";

/// A group message as seen by the engine.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub group: GroupKey,
    pub sender: UserKey,
    pub sender_name: String,
    pub body: String,
    pub message_id: Option<i32>,
}

/// What the engine did with a message.
#[derive(Debug, Clone)]
pub enum Verdict {
    /// No forbidden word.
    Clean,
    /// Violation recorded without a reply.
    Recorded(usize),
    /// Violation recorded and the sender warned.
    Warned(usize),
    /// Sender removed; record cleared.
    Removed,
    /// Removal did not succeed; record cleared anyway.
    RemovalFailed(RemovalError),
}

/// Decides and carries out moderation actions.
#[derive(Clone)]
pub struct ModerationEngine {
    settings: Arc<SettingsRepository>,
    offenses: Arc<OffenseRepository>,
    membership: Arc<dyn Membership>,
    notifier: Arc<dyn Notifier>,
    removal_timeout: Duration,
}

impl ModerationEngine {
    pub fn new(
        settings: Arc<SettingsRepository>,
        offenses: Arc<OffenseRepository>,
        membership: Arc<dyn Membership>,
        notifier: Arc<dyn Notifier>,
        removal_timeout: Duration,
    ) -> Self {
        Self {
            settings,
            offenses,
            membership,
            notifier,
            removal_timeout,
        }
    }

    /// Moderate a message at the current wall-clock time.
    pub async fn handle(&self, msg: &InboundMessage) -> Verdict {
        self.handle_at(msg, now_millis()).await
    }

    /// Moderate a message as if evaluated at `now` (epoch ms).
    pub async fn handle_at(&self, msg: &InboundMessage, now: i64) -> Verdict {
        if !self.settings.is_violation(&msg.group, &msg.body).await {
            return Verdict::Clean;
        }

        let strike = self
            .offenses
            .record_strike(&msg.sender, now)
            .await
            .logged("offense ledger");

        debug!(
            "Violation by {} in {} (count {})",
            msg.sender, msg.group, strike.count
        );

        if strike.escalated {
            return self.escalate(msg).await;
        }

        if strike.count == WARN_THRESHOLD {
            let notice = Notice::new(msg.group.clone(), WARNING_TEXT).reply_to(msg.message_id);
            self.send(notice).await;
            info!("Warned user {} in group {}", msg.sender, msg.group);
            return Verdict::Warned(strike.count);
        }

        info!(
            "User {} - offense {} in group {} (silent)",
            msg.sender, strike.count, msg.group
        );
        Verdict::Recorded(strike.count)
    }

    /// The ledger entry is already cleared when this runs.
    async fn escalate(&self, msg: &InboundMessage) -> Verdict {
        let removal = timeout(
            self.removal_timeout,
            self.membership.remove_from_group(&msg.group, &msg.sender),
        )
        .await
        .unwrap_or(Err(RemovalError::Timeout(self.removal_timeout)));

        match removal {
            Ok(()) => {
                info!("Removed user {} from group {}", msg.sender, msg.group);
                let notice = Notice::new(msg.group.clone(), REMOVED_TEXT)
                    .reply_to(msg.message_id)
                    .mention(msg.sender.clone(), msg.sender_name.clone());
                self.send(notice).await;
                Verdict::Removed
            }
            Err(e) => {
                warn!(
                    "Failed to remove user {} from group {}: {}",
                    msg.sender, msg.group, e
                );
                let notice =
                    Notice::new(msg.group.clone(), REMOVAL_FAILED_TEXT).reply_to(msg.message_id);
                self.send(notice).await;
                Verdict::RemovalFailed(e)
            }
        }
    }

    async fn send(&self, notice: Notice) {
        let group = notice.group.clone();
        if let Err(e) = self.notifier.notify(notice).await {
            warn!("Failed to send notice to {}: {}", group, e);
        }
    }
}

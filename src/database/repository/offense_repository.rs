//! Offense ledger repository.
//!
//! One lock guards the whole ledger; decisions (prune, count, threshold) run
//! synchronously inside it. Writes are ordered by the file's write turn.

use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::info;

use crate::database::json_store::{Flushed, JsonFile};
use crate::database::models::{OffenseLedger, Strike, SweepReport, UserKey};

/// Repository for the offense ledger.
pub struct OffenseRepository {
    ledger: Mutex<OffenseLedger>,
    file: JsonFile,
}

impl OffenseRepository {
    /// Load the ledger from `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let file = JsonFile::new(path);
        let mut ledger: OffenseLedger = file.load().await;
        ledger.normalize();
        info!(
            "Loaded offense records for {} users from {}",
            ledger.len(),
            file.path().display()
        );

        Self {
            ledger: Mutex::new(ledger),
            file,
        }
    }

    /// Record a violation and return the in-window count.
    #[cfg(test)]
    pub async fn record_offense(&self, user: &UserKey, now: i64) -> Flushed<usize> {
        self.commit(|ledger| ledger.record_offense(user, now)).await
    }

    /// Record a violation, claiming escalation when the removal threshold is hit.
    pub async fn record_strike(&self, user: &UserKey, now: i64) -> Flushed<Strike> {
        self.commit(|ledger| ledger.strike(user, now)).await
    }

    /// Delete a user's record. The value is `true` if one existed.
    pub async fn reset(&self, user: &UserKey) -> Flushed<bool> {
        self.commit(|ledger| ledger.reset(user)).await
    }

    /// In-window violation count. Prunes, but does not write.
    pub fn offense_count(&self, user: &UserKey, now: i64) -> usize {
        self.ledger.lock().peek(user, now)
    }

    /// Prune every record and persist once.
    pub async fn sweep(&self, now: i64) -> Flushed<SweepReport> {
        self.commit(|ledger| ledger.sweep(now)).await
    }

    #[cfg(test)]
    pub fn record(&self, user: &UserKey) -> Option<crate::database::models::OffenseRecord> {
        self.ledger.lock().get(user).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.ledger.lock().len()
    }

    async fn commit<T, F>(&self, mutator: F) -> Flushed<T>
    where
        F: FnOnce(&mut OffenseLedger) -> T + Send,
        T: Send,
    {
        let _turn = self.file.writer().await;

        let (value, snapshot) = {
            let mut ledger = self.ledger.lock();
            let value = mutator(&mut ledger);
            (value, serde_json::to_vec_pretty(&*ledger))
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
    use std::sync::Arc;

    use super::*;
    use crate::database::models::REMOVAL_THRESHOLD;

    const HOUR: i64 = 60 * 60 * 1000;
    const T0: i64 = 1_700_000_000_000;

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user-offenses.json");
        let user = UserKey::new("42");

        {
            let repo = OffenseRepository::open(&path).await;
            assert_eq!(repo.record_offense(&user, T0).await.into_result().unwrap(), 1);
            assert_eq!(
                repo.record_offense(&user, T0 + HOUR).await.into_result().unwrap(),
                2
            );
        }

        let repo = OffenseRepository::open(&path).await;
        assert_eq!(repo.offense_count(&user, T0 + 2 * HOUR), 2);
        assert_eq!(repo.record(&user).unwrap().timestamps(), &[T0, T0 + HOUR]);
    }

    #[tokio::test]
    async fn test_reset_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user-offenses.json");
        let user = UserKey::new("42");

        {
            let repo = OffenseRepository::open(&path).await;
            let _ = repo.record_offense(&user, T0).await;
            assert!(repo.reset(&user).await.into_result().unwrap());
        }

        let repo = OffenseRepository::open(&path).await;
        assert_eq!(repo.offense_count(&user, T0), 0);
        assert_eq!(repo.user_count(), 0);
    }

    #[tokio::test]
    async fn test_sweep_persists_even_without_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user-offenses.json");
        let repo = OffenseRepository::open(&path).await;

        let report = repo.sweep(T0).await.into_result().unwrap();
        assert_eq!(report, SweepReport::default());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_memory_state() {
        let dir = tempfile::tempdir().unwrap();
        let repo = OffenseRepository::open(dir.path().join("gone").join("o.json")).await;
        let user = UserKey::new("42");

        let flushed = repo.record_offense(&user, T0).await;
        assert_eq!(flushed.value, 1);
        assert!(flushed.flush.is_err());
        assert_eq!(repo.offense_count(&user, T0), 1);
    }

    #[tokio::test]
    async fn test_concurrent_strikes_escalate_once() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(OffenseRepository::open(dir.path().join("o.json")).await);
        let user = UserKey::new("42");

        let mut tasks = Vec::new();
        for i in 0..REMOVAL_THRESHOLD as i64 + 2 {
            let repo = repo.clone();
            let user = user.clone();
            tasks.push(tokio::spawn(async move {
                repo.record_strike(&user, T0 + i).await.value
            }));
        }

        let mut escalations = 0;
        for task in tasks {
            if task.await.unwrap().escalated {
                escalations += 1;
            }
        }
        assert_eq!(escalations, 1);
        assert_eq!(repo.offense_count(&user, T0 + 10), 2);
    }
}

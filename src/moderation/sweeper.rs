//! Periodic offense cleanup.
//!
//! Prunes expired timestamps from every record, drops empty records and
//! rewrites the ledger once per pass.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::database::{OffenseRepository, SweepReport, now_millis};

#[derive(Clone)]
pub struct Sweeper {
    inner: Arc<SweeperInner>,
}

struct SweeperInner {
    offenses: Arc<OffenseRepository>,
    period: Duration,
    /// Serializes passes so two never interleave.
    pass: tokio::sync::Mutex<()>,
    task: Mutex<Option<SweepTask>>,
}

struct SweepTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Sweeper {
    pub fn new(offenses: Arc<OffenseRepository>, period: Duration) -> Self {
        Self {
            inner: Arc::new(SweeperInner {
                offenses,
                period,
                pass: tokio::sync::Mutex::new(()),
                task: Mutex::new(None),
            }),
        }
    }

    /// Spawn the periodic task. Returns `false` if it is already running.
    ///
    /// The first pass runs one period after start.
    pub fn start(&self) -> bool {
        let mut task = self.inner.task.lock();
        if task.is_some() {
            return false;
        }

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let sweeper = self.clone();
        let period = self.inner.period;

        let handle = tokio::spawn(async move {
            let mut tick = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tick.tick() => {
                        sweeper.sweep_now().await;
                    }
                }
            }
            debug!("Offense sweeper stopped");
        });

        *task = Some(SweepTask { cancel, handle });
        info!("Offense sweeper started (every {:?})", period);
        true
    }

    /// Stop the periodic task and wait for it to exit.
    pub async fn stop(&self) {
        let task = self.inner.task.lock().take();
        if let Some(task) = task {
            task.cancel.cancel();
            let _ = task.handle.await;
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.inner.task.lock().is_some()
    }

    /// Run one pass now.
    pub async fn sweep_now(&self) -> SweepReport {
        self.sweep_at(now_millis()).await
    }

    /// Run one pass as if at `now` (epoch ms).
    pub async fn sweep_at(&self, now: i64) -> SweepReport {
        let _pass = self.inner.pass.lock().await;

        let report = self
            .inner
            .offenses
            .sweep(now)
            .await
            .logged("offense sweep");

        info!(
            "Cleaned up old offenses: {} users retained, {} dropped",
            report.retained, report.dropped
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::UserKey;

    const HOUR: i64 = 60 * 60 * 1000;
    const T0: i64 = 1_700_000_000_000;

    #[tokio::test]
    async fn test_sweep_drops_expired_users() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user-offenses.json");
        let offenses = Arc::new(OffenseRepository::open(&path).await);

        // u0, u1 offended 7h before the sweep; u2..u4 within the window.
        for i in 0..5 {
            let at = if i < 2 { T0 - 7 * HOUR } else { T0 - HOUR };
            let _ = offenses.record_offense(&UserKey::new(format!("u{i}")), at).await;
        }

        let sweeper = Sweeper::new(offenses.clone(), Duration::from_secs(1800));
        let report = sweeper.sweep_at(T0).await;

        assert_eq!(report.retained, 3);
        assert_eq!(report.dropped, 2);
        assert_eq!(offenses.user_count(), 3);

        let reopened = OffenseRepository::open(&path).await;
        assert_eq!(reopened.user_count(), 3);
        assert!(reopened.record(&UserKey::new("u0")).is_none());
    }

    #[tokio::test]
    async fn test_start_and_stop() {
        let dir = tempfile::tempdir().unwrap();
        let offenses = Arc::new(OffenseRepository::open(dir.path().join("o.json")).await);
        let sweeper = Sweeper::new(offenses, Duration::from_millis(10));

        assert!(sweeper.start());
        assert!(!sweeper.start());
        assert!(sweeper.is_running());

        tokio::time::sleep(Duration::from_millis(35)).await;
        sweeper.stop().await;

        assert!(!sweeper.is_running());
        assert!(dir.path().join("o.json").exists());
    }
}

//! Offense ledger models.
//!
//! Per-user violation history with sliding-window semantics. The ledger is
//! keyed by user only, so a user's count is shared across every group.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::keys::UserKey;

/// Violations older than this no longer count.
pub const OFFENSE_WINDOW: Duration = Duration::from_secs(6 * 60 * 60);

/// Count at which the offender gets a warning reply.
pub const WARN_THRESHOLD: usize = 2;

/// Count at which the offender is removed from the group.
pub const REMOVAL_THRESHOLD: usize = 3;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn window_millis() -> i64 {
    OFFENSE_WINDOW.as_millis() as i64
}

/// Whether a violation at `timestamp` still counts at `now`.
pub fn within_window(timestamp: i64, now: i64) -> bool {
    now.saturating_sub(timestamp) < window_millis()
}

/// Violation history of one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenseRecord {
    /// Always `timestamps.len()` after the last prune
    #[serde(default)]
    count: usize,

    /// Epoch milliseconds, chronological
    #[serde(default)]
    timestamps: Vec<i64>,
}

impl OffenseRecord {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    fn prune(&mut self, now: i64) {
        self.timestamps.retain(|&t| within_window(t, now));
        self.count = self.timestamps.len();
    }

    fn push(&mut self, now: i64) {
        self.timestamps.push(now);
        self.count = self.timestamps.len();
    }

    fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Outcome of recording one violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    /// Count right after recording, before any escalation reset
    pub count: usize,
    /// The count reached [`REMOVAL_THRESHOLD`] and the record was cleared
    pub escalated: bool,
}

/// Counts from one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub retained: usize,
    pub dropped: usize,
}

/// All offense records, keyed by user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OffenseLedger {
    records: HashMap<UserKey, OffenseRecord>,
}

impl OffenseLedger {
    /// Repair a loaded ledger: drop pre-epoch timestamps, recompute counts
    /// and drop empty records.
    pub fn normalize(&mut self) {
        self.records.retain(|_, record| {
            record.timestamps.retain(|&t| t >= 0);
            record.count = record.timestamps.len();
            !record.is_empty()
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, user: &UserKey) -> Option<&OffenseRecord> {
        self.records.get(user)
    }

    /// Drop the user's expired timestamps, and the user once none are left.
    pub fn prune(&mut self, user: &UserKey, now: i64) {
        if let Some(record) = self.records.get_mut(user) {
            record.prune(now);
            if record.is_empty() {
                self.records.remove(user);
            }
        }
    }

    /// Record a violation at `now` and return the updated count.
    pub fn record_offense(&mut self, user: &UserKey, now: i64) -> usize {
        self.prune(user, now);
        let record = self.records.entry(user.clone()).or_default();
        record.push(now);
        record.count
    }

    /// Record a violation and clear the record if it reaches the removal
    /// threshold, so one threshold crossing escalates exactly once.
    pub fn strike(&mut self, user: &UserKey, now: i64) -> Strike {
        let count = self.record_offense(user, now);
        let escalated = count >= REMOVAL_THRESHOLD;
        if escalated {
            self.reset(user);
        }
        Strike { count, escalated }
    }

    /// Delete the user's record. Returns `true` if one existed.
    pub fn reset(&mut self, user: &UserKey) -> bool {
        self.records.remove(user).is_some()
    }

    /// Count of in-window violations for the user.
    pub fn peek(&mut self, user: &UserKey, now: i64) -> usize {
        self.prune(user, now);
        self.records.get(user).map(OffenseRecord::count).unwrap_or(0)
    }

    /// Prune every record.
    pub fn sweep(&mut self, now: i64) -> SweepReport {
        let before = self.records.len();
        self.records.retain(|_, record| {
            record.prune(now);
            !record.is_empty()
        });
        SweepReport {
            retained: self.records.len(),
            dropped: before - self.records.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 60 * 60 * 1000;
    const T0: i64 = 1_700_000_000_000;

    fn user(id: &str) -> UserKey {
        UserKey::new(id)
    }

    #[test]
    fn test_first_offense_counts_one() {
        let mut ledger = OffenseLedger::default();
        assert_eq!(ledger.record_offense(&user("a"), T0), 1);
        assert_eq!(ledger.get(&user("a")).unwrap().timestamps(), &[T0]);
    }

    #[test]
    fn test_second_offense_within_window_counts_two() {
        let mut ledger = OffenseLedger::default();
        ledger.record_offense(&user("a"), T0);
        assert_eq!(ledger.record_offense(&user("a"), T0 + HOUR), 2);
    }

    #[test]
    fn test_expired_offense_disappears_on_peek() {
        let mut ledger = OffenseLedger::default();
        ledger.record_offense(&user("a"), T0);

        assert_eq!(ledger.peek(&user("a"), T0 + 7 * HOUR), 0);
        assert!(ledger.get(&user("a")).is_none());
    }

    #[test]
    fn test_offense_after_expiry_starts_over() {
        let mut ledger = OffenseLedger::default();
        ledger.record_offense(&user("a"), T0);
        ledger.record_offense(&user("a"), T0 + HOUR);

        assert_eq!(ledger.record_offense(&user("a"), T0 + 8 * HOUR), 1);
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let window = OFFENSE_WINDOW.as_millis() as i64;
        let mut ledger = OffenseLedger::default();
        ledger.record_offense(&user("a"), T0);

        assert_eq!(ledger.peek(&user("a"), T0 + window - 1), 1);
        assert_eq!(ledger.peek(&user("a"), T0 + window), 0);
    }

    #[test]
    fn test_prune_keeps_exactly_in_window_timestamps() {
        let window = OFFENSE_WINDOW.as_millis() as i64;
        let now = T0 + 10 * HOUR;
        let stamps: Vec<i64> = (0..=20).map(|i| T0 + i * HOUR / 2).collect();

        let mut ledger = OffenseLedger::default();
        for &t in &stamps {
            ledger.records.entry(user("a")).or_default().push(t);
        }
        ledger.prune(&user("a"), now);

        let kept = ledger.get(&user("a")).unwrap().timestamps().to_vec();
        for t in stamps {
            assert_eq!(kept.contains(&t), now - t < window, "timestamp {t}");
        }
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut ledger = OffenseLedger::default();
        ledger.record_offense(&user("a"), T0);
        ledger.record_offense(&user("a"), T0 + 3 * HOUR);
        ledger.record_offense(&user("b"), T0);

        let now = T0 + 7 * HOUR;
        ledger.prune(&user("a"), now);
        ledger.prune(&user("b"), now);
        let once = ledger.clone();

        ledger.prune(&user("a"), now);
        ledger.prune(&user("b"), now);
        ledger.prune(&user("absent"), now);
        assert_eq!(ledger, once);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_record_never_decreases_in_window_count() {
        let mut ledger = OffenseLedger::default();
        let mut previous = 0;
        for i in 0..10 {
            let now = T0 + i * 10 * 60 * 1000;
            let before = ledger.peek(&user("a"), now);
            assert_eq!(before, previous);
            let after = ledger.record_offense(&user("a"), now);
            assert!(after > before);
            previous = after;
        }
    }

    #[test]
    fn test_strike_escalates_once_per_crossing() {
        let mut ledger = OffenseLedger::default();
        let strikes: Vec<Strike> = (0..5)
            .map(|i| ledger.strike(&user("a"), T0 + i * 1000))
            .collect();

        let escalations = strikes.iter().filter(|s| s.escalated).count();
        assert_eq!(escalations, 1);
        assert_eq!(strikes[2], Strike { count: 3, escalated: true });
        assert_eq!(strikes[3].count, 1);
        assert_eq!(ledger.peek(&user("a"), T0 + 5000), 2);
    }

    #[test]
    fn test_reset_clears_for_any_time() {
        let mut ledger = OffenseLedger::default();
        ledger.record_offense(&user("a"), T0);
        ledger.record_offense(&user("a"), T0 + 1);

        assert!(ledger.reset(&user("a")));
        assert!(!ledger.reset(&user("a")));
        for now in [T0, T0 + HOUR, T0 + 100 * HOUR] {
            assert_eq!(ledger.peek(&user("a"), now), 0);
        }
    }

    #[test]
    fn test_sweep_drops_fully_expired_users() {
        let mut ledger = OffenseLedger::default();
        ledger.record_offense(&user("old-1"), T0);
        ledger.record_offense(&user("old-2"), T0 + HOUR);
        ledger.record_offense(&user("mixed"), T0);
        ledger.record_offense(&user("mixed"), T0 + 5 * HOUR);
        ledger.record_offense(&user("fresh-1"), T0 + 6 * HOUR);
        ledger.record_offense(&user("fresh-2"), T0 + 7 * HOUR);

        let now = T0 + 8 * HOUR;
        let report = ledger.sweep(now);

        assert_eq!(report, SweepReport { retained: 3, dropped: 2 });
        assert_eq!(ledger.get(&user("mixed")).unwrap().timestamps(), &[T0 + 5 * HOUR]);
        for id in ["mixed", "fresh-1", "fresh-2"] {
            let record = ledger.get(&user(id)).unwrap();
            assert_eq!(record.count(), record.timestamps().len());
            assert!(record.timestamps().iter().all(|&t| within_window(t, now)));
        }
    }

    #[test]
    fn test_loaded_counts_are_recomputed() {
        let raw = r#"{
            "a": {"count": 9, "timestamps": [1, 2]},
            "b": {"count": 1, "timestamps": []}
        }"#;
        let mut ledger: OffenseLedger = serde_json::from_str(raw).unwrap();
        ledger.normalize();

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(&user("a")).unwrap().count(), 2);
    }

    #[test]
    fn test_extreme_loaded_timestamps_do_not_overflow() {
        let raw = r#"{
            "low": {"count": 1, "timestamps": [-9223372036854775808]},
            "high": {"count": 1, "timestamps": [9223372036854775807]}
        }"#;
        let mut ledger: OffenseLedger = serde_json::from_str(raw).unwrap();
        ledger.normalize();

        assert!(ledger.get(&user("low")).is_none());
        assert_eq!(ledger.peek(&user("low"), T0), 0);

        // Future timestamps are compared without wrapping
        assert!(!within_window(i64::MIN, T0));
        assert!(within_window(i64::MAX, T0));
        assert_eq!(ledger.peek(&user("high"), T0), 1);
        let report = ledger.sweep(i64::MAX);
        assert_eq!(report.retained, 1);
    }

    #[test]
    fn test_serialized_shape() {
        let mut ledger = OffenseLedger::default();
        ledger.record_offense(&user("42"), T0);

        let value = serde_json::to_value(&ledger).unwrap();
        assert_eq!(value["42"]["count"], 1);
        assert_eq!(value["42"]["timestamps"][0], T0);
    }
}

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessState {
    Fresh,
    Stale,
    Offline,
}

const STALE_AFTER_MINUTES: i64 = 10;
const OFFLINE_AFTER_MINUTES: i64 = 30;
const OFFLINE_AFTER_FAILURES: u32 = 3;

#[must_use]
pub fn evaluate_freshness(
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
) -> FreshnessState {
    evaluate_freshness_at(last_success, consecutive_failures, Utc::now())
}

#[must_use]
pub fn evaluate_freshness_at(
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    now: DateTime<Utc>,
) -> FreshnessState {
    let Some(last_success) = last_success else {
        return if consecutive_failures >= OFFLINE_AFTER_FAILURES {
            FreshnessState::Offline
        } else {
            FreshnessState::Stale
        };
    };

    let age = now - last_success;

    if age > Duration::minutes(OFFLINE_AFTER_MINUTES)
        || consecutive_failures >= OFFLINE_AFTER_FAILURES
    {
        FreshnessState::Offline
    } else if age > Duration::minutes(STALE_AFTER_MINUTES) || consecutive_failures >= 1 {
        FreshnessState::Stale
    } else {
        FreshnessState::Fresh
    }
}

/// Success and failure bookkeeping for the snapshot slot.
#[derive(Debug, Clone, Default)]
pub struct RefreshMetadata {
    pub last_success: Option<DateTime<Utc>>,
    pub last_attempt: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

impl RefreshMetadata {
    pub fn mark_attempt(&mut self) {
        self.last_attempt = Some(Utc::now());
    }

    pub fn mark_success(&mut self) {
        let now = Utc::now();
        self.last_attempt = Some(now);
        self.last_success = Some(now);
        self.consecutive_failures = 0;
    }

    pub fn mark_failure(&mut self) {
        self.last_attempt = Some(Utc::now());
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    #[must_use]
    pub fn state(&self) -> FreshnessState {
        evaluate_freshness(self.last_success, self.consecutive_failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(now: DateTime<Utc>, minutes_ago: i64, failures: u32) -> FreshnessState {
        evaluate_freshness_at(Some(now - Duration::minutes(minutes_ago)), failures, now)
    }

    #[test]
    fn never_succeeded_is_stale_until_repeated_failures() {
        let now = Utc::now();
        assert_eq!(evaluate_freshness_at(None, 0, now), FreshnessState::Stale);
        assert_eq!(evaluate_freshness_at(None, 2, now), FreshnessState::Stale);
        assert_eq!(evaluate_freshness_at(None, 3, now), FreshnessState::Offline);
    }

    #[test]
    fn age_thresholds() {
        let now = Utc::now();
        assert_eq!(at(now, 5, 0), FreshnessState::Fresh);
        assert_eq!(at(now, 10, 0), FreshnessState::Fresh);
        assert_eq!(at(now, 11, 0), FreshnessState::Stale);
        assert_eq!(at(now, 30, 0), FreshnessState::Stale);
        assert_eq!(at(now, 31, 0), FreshnessState::Offline);
    }

    #[test]
    fn failures_degrade_recent_snapshots() {
        let now = Utc::now();
        assert_eq!(at(now, 1, 1), FreshnessState::Stale);
        assert_eq!(at(now, 1, 3), FreshnessState::Offline);
    }

    #[test]
    fn metadata_tracks_success_and_failure_streaks() {
        let mut meta = RefreshMetadata::default();
        meta.mark_failure();
        meta.mark_failure();
        assert_eq!(meta.consecutive_failures, 2);
        assert!(meta.last_success.is_none());

        meta.mark_success();
        assert_eq!(meta.consecutive_failures, 0);
        assert_eq!(meta.state(), FreshnessState::Fresh);
        assert!(meta.last_success.is_some());
    }
}

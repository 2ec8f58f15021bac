//! View de-duplication policy.
//!
//! A viewer key is counted once per window. The window is anchored at the
//! last *counted* view: duplicate hits inside the window leave
//! `last_viewed_at` untouched, so a viewer refreshing continuously is counted
//! again as soon as the window has elapsed since the last increment.

use chrono::{DateTime, TimeDelta, Utc};

/// What to do with a view event for a (post, viewer) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDecision {
    /// No ledger row yet: insert it and increment.
    FirstView,
    /// Seen within the window: leave everything as is.
    Duplicate,
    /// Seen before the window: bump `last_viewed_at` and increment.
    Refresh,
}

impl ViewDecision {
    /// Whether this decision increments the view counter.
    #[must_use]
    pub const fn increments(self) -> bool {
        matches!(self, Self::FirstView | Self::Refresh)
    }
}

/// Fixed-window view de-duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPolicy {
    window: TimeDelta,
}

impl ViewPolicy {
    /// Create a policy with the given window.
    #[must_use]
    pub const fn new(window: TimeDelta) -> Self {
        Self { window }
    }

    /// Decide how to treat a view at `now` given the ledger's `last_viewed_at`.
    ///
    /// A `last_viewed_at` in the future (clock skew between app servers) is
    /// treated as a duplicate.
    #[must_use]
    pub fn decide(&self, last_viewed_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> ViewDecision {
        match last_viewed_at {
            None => ViewDecision::FirstView,
            Some(last) if now - last < self.window => ViewDecision::Duplicate,
            Some(_) => ViewDecision::Refresh,
        }
    }
}

impl Default for ViewPolicy {
    fn default() -> Self {
        Self::new(TimeDelta::minutes(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + TimeDelta::minutes(minutes)
    }

    #[test]
    fn test_first_view() {
        let policy = ViewPolicy::default();
        assert_eq!(policy.decide(None, at(0)), ViewDecision::FirstView);
        assert!(ViewDecision::FirstView.increments());
    }

    #[test]
    fn test_within_window_is_duplicate() {
        let policy = ViewPolicy::default();
        assert_eq!(policy.decide(Some(at(0)), at(0)), ViewDecision::Duplicate);
        assert_eq!(policy.decide(Some(at(0)), at(29)), ViewDecision::Duplicate);
        assert!(!ViewDecision::Duplicate.increments());
    }

    #[test]
    fn test_window_boundary_counts_again() {
        let policy = ViewPolicy::default();
        assert_eq!(policy.decide(Some(at(0)), at(30)), ViewDecision::Refresh);
        assert_eq!(policy.decide(Some(at(0)), at(31)), ViewDecision::Refresh);
    }

    #[test]
    fn test_future_timestamp_is_duplicate() {
        let policy = ViewPolicy::default();
        assert_eq!(policy.decide(Some(at(10)), at(0)), ViewDecision::Duplicate);
    }

    #[test]
    fn test_custom_window() {
        let policy = ViewPolicy::new(TimeDelta::seconds(60));
        let start = at(0);
        assert_eq!(
            policy.decide(Some(start), start + TimeDelta::seconds(59)),
            ViewDecision::Duplicate
        );
        assert_eq!(
            policy.decide(Some(start), start + TimeDelta::seconds(60)),
            ViewDecision::Refresh
        );
    }

    #[test]
    fn test_anchored_window_under_continuous_traffic() {
        // Hits every 10 minutes from t=0: counted at 0, 30 and 60.
        let policy = ViewPolicy::default();
        let mut last = None;
        let mut counted = Vec::new();

        for minute in (0..=60).step_by(10) {
            let decision = policy.decide(last, at(minute));
            if decision.increments() {
                last = Some(at(minute));
                counted.push(minute);
            }
        }

        assert_eq!(counted, vec![0, 30, 60]);
    }
}

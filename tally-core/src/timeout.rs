//! Adaptive statement timeout.
//!
//! Deep offsets on large unindexed scans take proportionally longer, so the
//! per-statement budget grows with the page offset, capped at a fixed
//! addition over the base.

use std::time::Duration;

const DEFAULT_BASE: Duration = Duration::from_secs(120);
const DEFAULT_MAX_EXTRA: Duration = Duration::from_secs(180);

/// Timeout growth curve: `base + min(offset * 1ms, max_extra)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    pub base: Duration,
    pub max_extra: Duration,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            max_extra: DEFAULT_MAX_EXTRA,
        }
    }
}

impl TimeoutPolicy {
    /// Budget for the statement pair serving the page at `offset`: one
    /// extra millisecond per skipped row, up to `max_extra`. Both
    /// statements of a pair use the same budget.
    pub fn for_offset(&self, offset: i64) -> Duration {
        let extra = Duration::from_millis(offset.max(0) as u64).min(self.max_extra);
        self.base + extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_gets_the_base_budget() {
        let policy = TimeoutPolicy::default();
        assert_eq!(policy.for_offset(0), Duration::from_secs(120));
    }

    #[test]
    fn budget_grows_linearly_with_offset() {
        let policy = TimeoutPolicy::default();
        assert_eq!(policy.for_offset(60_000), Duration::from_secs(180));
        assert_eq!(policy.for_offset(90_000), Duration::from_secs(210));
    }

    #[test]
    fn growth_is_capped() {
        let policy = TimeoutPolicy::default();
        assert_eq!(policy.for_offset(180_000), Duration::from_secs(300));
        assert_eq!(policy.for_offset(10_000_000), Duration::from_secs(300));
    }

    #[test]
    fn negative_offsets_get_the_base_budget() {
        let policy = TimeoutPolicy::default();
        assert_eq!(policy.for_offset(-5), Duration::from_secs(120));
    }

    #[test]
    fn custom_curves_are_respected() {
        let policy = TimeoutPolicy {
            base: Duration::from_secs(10),
            max_extra: Duration::from_secs(5),
        };
        assert_eq!(policy.for_offset(0), Duration::from_secs(10));
        assert_eq!(policy.for_offset(2_000), Duration::from_secs(12));
        assert_eq!(policy.for_offset(100_000), Duration::from_secs(15));
    }
}

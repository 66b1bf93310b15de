//! Fixed-interval timer behind the auto-refresh toggle.

use crate::services::refresh::RefreshTrigger;
use tokio::time::{Duration, Instant, Interval, MissedTickBehavior, interval_at};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(3);

/// Fires [`RefreshTrigger::Timer`] every `period` while enabled. The first
/// tick after creation or re-enabling comes one full period later.
pub struct AutoRefresh {
    interval: Interval,
    enabled: bool,
}

impl AutoRefresh {
    /// A zero `period` falls back to [`DEFAULT_REFRESH_INTERVAL`].
    pub fn new(period: Duration, enabled: bool) -> Self {
        let period = if period.is_zero() {
            DEFAULT_REFRESH_INTERVAL
        } else {
            period
        };
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval, enabled }
    }

    pub fn period(&self) -> Duration {
        self.interval.period()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.interval.reset();
        }
        self.enabled = enabled;
    }

    /// Resolves on the next tick; never resolves while disabled.
    pub async fn tick(&mut self) -> RefreshTrigger {
        if !self.enabled {
            std::future::pending::<()>().await;
        }
        self.interval.tick().await;
        RefreshTrigger::Timer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    const PERIOD: Duration = Duration::from_secs(3);

    #[tokio::test(start_paused = true)]
    async fn fires_every_period_while_enabled() {
        let mut auto = AutoRefresh::new(PERIOD, true);
        let start = Instant::now();

        assert_eq!(auto.tick().await, RefreshTrigger::Timer);
        assert!(start.elapsed() >= PERIOD && start.elapsed() < PERIOD * 2);

        assert_eq!(auto.tick().await, RefreshTrigger::Timer);
        assert!(start.elapsed() >= PERIOD * 2 && start.elapsed() < PERIOD * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stays_silent_while_disabled() {
        let mut auto = AutoRefresh::new(PERIOD, true);
        auto.set_enabled(false);
        assert!(!auto.is_enabled());

        assert!(timeout(PERIOD * 10, auto.tick()).await.is_err());

        let mut never_enabled = AutoRefresh::new(PERIOD, false);
        assert!(timeout(PERIOD * 10, never_enabled.tick()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn re_enabling_waits_a_full_period() {
        let mut auto = AutoRefresh::new(PERIOD, false);
        tokio::time::advance(PERIOD * 5).await;

        auto.set_enabled(true);
        let enabled_at = Instant::now();
        assert_eq!(auto.tick().await, RefreshTrigger::Timer);
        let waited = enabled_at.elapsed();
        assert!(waited >= PERIOD && waited < PERIOD * 2, "waited {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_uses_default() {
        let auto = AutoRefresh::new(Duration::ZERO, true);
        assert_eq!(auto.period(), DEFAULT_REFRESH_INTERVAL);
    }
}

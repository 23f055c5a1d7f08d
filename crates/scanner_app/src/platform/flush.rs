use std::time::Duration;

use tokio::time::{self, Interval, MissedTickBehavior};

/// Fixed-rate timer that paces job-list republishing, independent of how
/// fast status frames arrive.
pub struct FlushScheduler {
    interval: Interval,
}

impl FlushScheduler {
    pub fn new(period: Duration) -> Self {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    /// Resolves at the next flush. Cancel-safe.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

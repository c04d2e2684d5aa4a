use embassy_futures::yield_now;
use embassy_time::{block_for, Duration, Instant, Timer};

/// Waits until a conversion (or the reset) has finished.
///
/// The driver never shortens a wait, even after a failed command, so an
/// implementation only decides how the time is spent.
#[allow(async_fn_in_trait)]
pub trait SettleWait {
    async fn settle(&mut self, duration: Duration);
}

impl<T: SettleWait + ?Sized> SettleWait for &mut T {
    async fn settle(&mut self, duration: Duration) {
        T::settle(self, duration).await
    }
}

/// What happens between two looks at the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum YieldMode {
    /// Hand control back to the executor, then spin for one poll interval.
    Yield,
    /// Sleep on an embassy timer for one poll interval.
    Timer,
    /// Spin without yielding, for preemptive schedulers.
    Spin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooperativeWait {
    pub poll: Duration,
    pub mode: YieldMode,
}

impl CooperativeWait {
    pub const fn new(poll: Duration, mode: YieldMode) -> Self {
        Self { poll, mode }
    }
}

impl Default for CooperativeWait {
    fn default() -> Self {
        Self::new(Duration::from_micros(10), YieldMode::Yield)
    }
}

impl SettleWait for CooperativeWait {
    async fn settle(&mut self, duration: Duration) {
        let start = Instant::now();
        while start.elapsed() < duration {
            match self.mode {
                YieldMode::Yield => {
                    yield_now().await;
                    block_for(self.poll);
                }
                YieldMode::Timer => Timer::after(self.poll).await,
                YieldMode::Spin => block_for(self.poll),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    fn waits_at_least(mode: YieldMode) {
        let mut wait = CooperativeWait::new(Duration::from_micros(100), mode);
        let start = Instant::now();
        block_on(wait.settle(Duration::from_millis(2)));
        assert!(start.elapsed() >= Duration::from_millis(2));
    }

    #[test]
    fn yielding_wait_is_not_shortened() {
        waits_at_least(YieldMode::Yield);
    }

    #[test]
    fn timer_wait_is_not_shortened() {
        waits_at_least(YieldMode::Timer);
    }

    #[test]
    fn spinning_wait_is_not_shortened() {
        waits_at_least(YieldMode::Spin);
    }

    #[test]
    fn zero_duration_returns_immediately() {
        let mut wait = CooperativeWait::default();
        let start = Instant::now();
        block_on(wait.settle(Duration::from_ticks(0)));
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    async fn settle_with<W: SettleWait>(mut wait: W, duration: Duration) {
        wait.settle(duration).await
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut wait = CooperativeWait::new(Duration::from_micros(50), YieldMode::Spin);
        let start = Instant::now();
        block_on(settle_with(&mut wait, Duration::from_millis(1)));
        assert!(start.elapsed() >= Duration::from_millis(1));
    }
}

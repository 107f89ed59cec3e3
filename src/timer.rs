/// Gate that lets an action through at most once per interval of session time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    pub interval_ms: u64,
    last_fired_ms: Option<u64>,
}

impl IntervalTimer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_fired_ms: None,
        }
    }

    /// A timer that never fired is always ready.
    pub fn is_ready(&self, now_ms: u64) -> bool {
        self.last_fired_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.interval_ms)
    }

    /// Fires and restarts the interval if ready.
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        if !self.is_ready(now_ms) {
            return false;
        }
        self.last_fired_ms = Some(now_ms);
        true
    }

    pub fn reset(&mut self) {
        self.last_fired_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_timer_fires_immediately() {
        let mut timer = IntervalTimer::new(600);
        assert!(timer.try_fire(0));
        assert!(!timer.try_fire(16));
    }

    #[test]
    fn test_timer_fires_again_after_interval() {
        let mut timer = IntervalTimer::new(600);
        assert!(timer.try_fire(100));
        assert!(!timer.try_fire(699));
        assert!(timer.try_fire(700));
    }

    #[test]
    fn test_reset_makes_timer_ready() {
        let mut timer = IntervalTimer::new(600);
        timer.try_fire(10);
        timer.reset();
        assert!(timer.is_ready(11));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_fires_at_most_once_per_interval(
                interval in 1u64..1000,
                step in 1u64..50,
                ticks in 1usize..500,
            ) {
                let mut timer = IntervalTimer::new(interval);
                let mut fired_at: Vec<u64> = Vec::new();
                for tick in 0..ticks as u64 {
                    let now = tick * step;
                    if timer.try_fire(now) {
                        fired_at.push(now);
                    }
                }
                for pair in fired_at.windows(2) {
                    prop_assert!(pair[1] - pair[0] >= interval);
                }
            }
        }
    }
}

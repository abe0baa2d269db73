//! Fixed-rate throttling for hover hit tests.

use std::time::Duration;

/// Drops calls that arrive faster than a fixed rate.
///
/// The first call always fires. Dropped calls are not queued.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    last_fired: Option<Duration>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_fired: None,
            min_interval,
        }
    }

    /// Limiter allowing at most `hz` calls per second. Non-positive rates
    /// never limit.
    pub fn per_second(hz: f32) -> Self {
        let min_interval = if hz > 0.0 {
            Duration::from_secs_f32(1.0 / hz)
        } else {
            Duration::ZERO
        };
        Self::new(min_interval)
    }

    pub fn try_fire(&mut self, now: Duration) -> bool {
        if let Some(last) = self.last_fired {
            if now.saturating_sub(last) < self.min_interval {
                return false;
            }
        }
        self.last_fired = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_call_fires_then_drops_inside_interval() {
        let mut limiter = RateLimiter::new(ms(40));
        assert!(limiter.try_fire(ms(0)));
        assert!(!limiter.try_fire(ms(10)));
        assert!(!limiter.try_fire(ms(39)));
        assert!(limiter.try_fire(ms(40)));
        assert!(!limiter.try_fire(ms(60)));
        assert!(limiter.try_fire(ms(100)));
    }

    #[test]
    fn twenty_five_hz_is_forty_ms() {
        let mut limiter = RateLimiter::per_second(25.0);
        assert!(limiter.try_fire(ms(1000)));
        assert!(!limiter.try_fire(ms(1030)));
        assert!(limiter.try_fire(ms(1041)));
    }

    #[test]
    fn reset_lets_next_call_through() {
        let mut limiter = RateLimiter::new(ms(40));
        assert!(limiter.try_fire(ms(5)));
        limiter.reset();
        assert!(limiter.try_fire(ms(6)));
    }
}

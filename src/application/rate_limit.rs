use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter per caller key.
///
/// A key gets `max_requests` within `window`; the window starts with the
/// key's first request and expires `window` later. Expired windows are
/// dropped on every check, so the map only holds recently active keys.
///
/// Windows are measured on the monotonic clock, never on wall-clock time,
/// so clock adjustments cannot stretch or shorten them.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one request for `key` now.
    pub fn check(&self, key: &str) -> Result<(), Duration> {
        self.check_at(key, Instant::now())
    }

    /// Counts one request for `key` at `now`. When the key is over its
    /// budget, returns how long until its window resets.
    pub fn check_at(&self, key: &str, now: Instant) -> Result<(), Duration> {
        let mut windows = self.windows.lock();
        let window = self.window;
        windows.retain(|_, w| now.saturating_duration_since(w.started) < window);

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if entry.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(entry.started);
            return Err(window.saturating_sub(elapsed));
        }
        entry.count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, secs: u64) -> Instant {
        base + Duration::from_secs(secs)
    }

    #[test]
    fn allows_up_to_the_budget_then_denies() {
        let base = Instant::now();
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(limiter.check_at("alice", at(base, 0)).is_ok());
        }
        assert_eq!(
            limiter.check_at("alice", at(base, 10)),
            Err(Duration::from_secs(50))
        );
    }

    #[test]
    fn keys_are_counted_independently() {
        let base = Instant::now();
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check_at("alice", at(base, 0)).is_ok());
        assert!(limiter.check_at("bob", at(base, 0)).is_ok());
        assert!(limiter.check_at("alice", at(base, 1)).is_err());
    }

    #[test]
    fn window_expiry_resets_the_budget() {
        let base = Instant::now();
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check_at("alice", at(base, 0)).is_ok());
        assert!(limiter.check_at("alice", at(base, 59)).is_err());
        assert!(limiter.check_at("alice", at(base, 60)).is_ok());
        assert!(limiter.check_at("alice", at(base, 61)).is_err());
    }

    #[test]
    fn zero_budget_denies_everything() {
        let limiter = RateLimiter::new(0, Duration::from_secs(30));
        assert_eq!(
            limiter.check_at("alice", Instant::now()),
            Err(Duration::from_secs(30))
        );
    }

    #[test]
    fn retry_after_never_exceeds_the_window() {
        let base = Instant::now();
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check_at("alice", at(base, 30)).is_ok());
        // An earlier reading than the window start must not extend the wait.
        assert_eq!(
            limiter.check_at("alice", at(base, 0)),
            Err(Duration::from_secs(60))
        );
    }
}

//! Per-IP fixed-window rate limiter
//!
//! The first request from an IP opens a window; up to `max_requests` are
//! admitted until the window elapses, after which the next request opens a
//! fresh one. Time comes from `tokio::time::Instant` so tests can pause and
//! advance the clock.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::error::RateLimitExceeded;

/// Quota left after an admitted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    /// Time until the current window closes
    pub reset_after: Duration,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<IpAddr, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count a request from `ip`, rejecting it once the window's quota is spent
    pub fn check(&self, ip: IpAddr) -> Result<RateLimitStatus, RateLimitExceeded> {
        let now = Instant::now();
        let mut windows = self.lock();

        let window = windows.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        let reset_after = self
            .window
            .saturating_sub(now.duration_since(window.started));

        if window.count >= self.max_requests {
            return Err(RateLimitExceeded {
                limit: self.max_requests,
                retry_after: reset_after,
            });
        }

        window.count += 1;
        Ok(RateLimitStatus {
            limit: self.max_requests,
            remaining: self.max_requests - window.count,
            reset_after,
        })
    }

    /// Drop windows that have elapsed. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.lock();
        let before = windows.len();
        windows.retain(|_, w| now.duration_since(w.started) < self.window);
        before - windows.len()
    }

    /// Number of IPs currently tracked
    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<IpAddr, Window>> {
        // The table holds plain counters; a panic mid-update cannot leave it inconsistent.
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;
    use std::sync::Arc;

    use super::*;

    const WINDOW: Duration = Duration::from_secs(15 * 60);

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(198, 51, 100, last))
    }

    #[tokio::test(start_paused = true)]
    async fn admits_up_to_max_then_rejects() {
        let limiter = RateLimiter::new(5, WINDOW);

        for expected_remaining in (0..5).rev() {
            let status = limiter.check(ip(1)).unwrap();
            assert_eq!(status.limit, 5);
            assert_eq!(status.remaining, expected_remaining);
            assert_eq!(status.reset_after, WINDOW);
        }

        let err = limiter.check(ip(1)).unwrap_err();
        assert_eq!(err.limit, 5);
        assert_eq!(err.retry_after, WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn window_resets_after_elapsing() {
        let limiter = RateLimiter::new(2, WINDOW);
        limiter.check(ip(1)).unwrap();
        limiter.check(ip(1)).unwrap();

        tokio::time::advance(Duration::from_secs(60)).await;
        let err = limiter.check(ip(1)).unwrap_err();
        assert_eq!(err.retry_after, WINDOW - Duration::from_secs(60));

        tokio::time::advance(WINDOW - Duration::from_secs(60)).await;
        let status = limiter.check(ip(1)).unwrap();
        assert_eq!(status.remaining, 1);
        assert_eq!(status.reset_after, WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn ips_are_counted_independently() {
        let limiter = RateLimiter::new(1, WINDOW);

        limiter.check(ip(1)).unwrap();
        assert!(limiter.check(ip(1)).is_err());
        assert!(limiter.check(ip(2)).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn prune_drops_only_expired_windows() {
        let limiter = RateLimiter::new(3, WINDOW);
        limiter.check(ip(1)).unwrap();

        tokio::time::advance(Duration::from_secs(600)).await;
        limiter.check(ip(2)).unwrap();

        tokio::time::advance(Duration::from_secs(300)).await;
        assert_eq!(limiter.prune(), 1);
        assert_eq!(limiter.tracked(), 1);

        // ip(2) keeps its count until its own window closes
        limiter.check(ip(2)).unwrap();
        limiter.check(ip(2)).unwrap();
        assert!(limiter.check(ip(2)).is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_checks_never_overcommit() {
        let limiter = Arc::new(RateLimiter::new(10, WINDOW));

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.check(ip(9)).is_ok() })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 10);
    }
}

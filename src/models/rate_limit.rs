use crate::error::{AppError, Result};

/// Fixed-window request counter for one client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitWindow {
    /// Requests seen in the current window
    pub requests: u64,
    /// Unix timestamp when the counter resets
    pub reset_at: i64,
}

impl RateLimitWindow {
    /// Create a new window starting at `now`
    pub fn new(now: i64, window_secs: i64) -> Self {
        Self {
            requests: 0,
            reset_at: now + window_secs,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.reset_at
    }

    /// Check if the limit allows one more request, and count it if allowed
    /// Returns Ok(()) if allowed, Err(RateLimitExceeded) if not
    pub fn check_and_increment(&mut self, now: i64, max_requests: u64, window_secs: i64) -> Result<()> {
        // Reset counter if the window has expired
        if self.is_expired(now) {
            self.requests = 0;
            self.reset_at = now + window_secs;
        }

        if self.requests >= max_requests {
            tracing::warn!(
                "Rate limit would be exceeded: {}/{}",
                self.requests,
                max_requests
            );
            return Err(AppError::RateLimitExceeded);
        }

        self.requests += 1;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u64 = 5;
    const WINDOW: i64 = 900;

    #[test]
    fn test_new_window() {
        let now = 1000000;
        let window = RateLimitWindow::new(now, WINDOW);

        assert_eq!(window.requests, 0);
        assert_eq!(window.reset_at, now + WINDOW);
        assert!(!window.is_expired(now));
    }

    #[test]
    fn test_check_and_increment_success() {
        let now = 1000000;
        let mut window = RateLimitWindow::new(now, WINDOW);

        assert!(window.check_and_increment(now, MAX, WINDOW).is_ok());
        assert_eq!(window.requests, 1);
    }

    #[test]
    fn test_limit_exceeded() {
        let now = 1000000;
        let mut window = RateLimitWindow::new(now, WINDOW);

        for _ in 0..MAX {
            assert!(window.check_and_increment(now, MAX, WINDOW).is_ok());
        }

        assert!(matches!(
            window.check_and_increment(now, MAX, WINDOW),
            Err(AppError::RateLimitExceeded)
        ));
    }

    #[test]
    fn test_window_reset() {
        let now = 1000000;
        let mut window = RateLimitWindow::new(now, WINDOW);

        for _ in 0..MAX {
            assert!(window.check_and_increment(now, MAX, WINDOW).is_ok());
        }

        // After the window resets, requests are allowed again
        let after_reset = now + WINDOW + 1;
        assert!(window.check_and_increment(after_reset, MAX, WINDOW).is_ok());
        assert_eq!(window.requests, 1);
        assert_eq!(window.reset_at, after_reset + WINDOW);
    }
}

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Above this many tracked keys, stale entries are swept on the next record.
const SWEEP_THRESHOLD: usize = 10_000;

/// Per-email attempt limiter using a fixed window.
///
/// Used for failed password sign-ins and for forms that make the auth
/// service send email (magic links, reset links).
pub struct AttemptLimiter {
    /// email -> (count, window_start)
    entries: DashMap<String, (u32, Instant)>,
    max_attempts: u32,
    window: Duration,
}

impl AttemptLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_attempts,
            window,
        }
    }

    /// 5 failed sign-ins per 15 minutes.
    pub fn sign_in() -> Self {
        Self::new(5, Duration::from_secs(15 * 60))
    }

    /// 3 outgoing emails per 15 minutes.
    pub fn email() -> Self {
        Self::new(3, Duration::from_secs(15 * 60))
    }

    /// Check if another attempt is allowed. Returns Err with retry-after seconds.
    /// Does NOT increment the counter; call `record()` for that.
    pub fn check(&self, email: &str) -> Result<(), u64> {
        let now = Instant::now();

        let Some(entry) = self.entries.get(&email.trim().to_lowercase()) else {
            return Ok(());
        };

        let (count, start) = entry.value();

        if now.duration_since(*start) > self.window {
            return Ok(());
        }

        if *count >= self.max_attempts {
            let elapsed = now.duration_since(*start).as_secs();
            return Err(self.window.as_secs().saturating_sub(elapsed));
        }

        Ok(())
    }

    pub fn record(&self, email: &str) {
        let now = Instant::now();

        if self.entries.len() > SWEEP_THRESHOLD {
            self.cleanup();
        }

        let mut entry = self
            .entries
            .entry(email.trim().to_lowercase())
            .or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > self.window {
            *count = 1;
            *start = now;
        } else {
            *count += 1;
        }
    }

    /// Forget an email, e.g. after a successful sign-in.
    pub fn reset(&self, email: &str) {
        self.entries.remove(&email.trim().to_lowercase());
    }

    /// Remove entries whose window has passed.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let window = self.window;
        self.entries
            .retain(|_, (_, start)| now.duration_since(*start) < window);
    }
}

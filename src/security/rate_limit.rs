//! Admission gate: a single shared token bucket.
//!
//! Every inbound request asks the gate once. The bucket refills continuously
//! at `rate` tokens per second up to `capacity`; a request is admitted only
//! when a whole token is available.

use std::sync::Mutex;
use std::time::Instant;

use crate::config::RateLimitConfig;

/// A simple token bucket.
#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn full(capacity: f64, now: Instant) -> Self {
        Self {
            tokens: capacity,
            last_update: now,
        }
    }

    fn try_acquire(&mut self, now: Instant, capacity: f64, refill_rate: f64) -> bool {
        // Saturates to zero if the caller's clock reading is older than ours.
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        if now > self.last_update {
            self.last_update = now;
        }

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Process-wide admission gate shared by all request handlers.
///
/// The refill and the take happen under one lock, so concurrent callers can
/// never both consume a token that existed only once.
#[derive(Debug)]
pub struct RateLimiter {
    bucket: Mutex<TokenBucket>,
    rate: f64,
    capacity: f64,
}

impl RateLimiter {
    /// Create a limiter refilling `rate` tokens per second with room for
    /// `burst` tokens. The bucket starts full.
    pub fn new(rate: f64, burst: u32) -> Self {
        let capacity = f64::from(burst);
        Self {
            bucket: Mutex::new(TokenBucket::full(capacity, Instant::now())),
            rate,
            capacity,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.requests_per_second, config.burst_size)
    }

    /// Admit or reject one request now.
    pub fn try_admit(&self) -> bool {
        self.try_admit_at(Instant::now())
    }

    /// Admit or reject one request as of `now`.
    pub fn try_admit_at(&self, now: Instant) -> bool {
        // Bucket fields stay coherent even if a holder panicked.
        let mut bucket = self
            .bucket
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        bucket.try_acquire(now, self.capacity, self.rate)
    }

    /// Tokens currently stored, without applying a refill.
    pub fn available_tokens(&self) -> f64 {
        self.bucket
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .tokens
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}

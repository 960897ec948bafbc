//! Time-boxed value cache.
//!
//! A [`TimedCache`] holds at most one value together with the instant it was
//! fetched and a freshness window. Callers decide what to do with a stale
//! value; the cache itself never refreshes anything.

use std::time::{Duration, Instant};

/// A single cached value with an explicit freshness window.
#[derive(Debug, Clone)]
pub struct TimedCache<T> {
    value: Option<T>,
    fetched_at: Option<Instant>,
    ttl: Duration,
}

impl<T> TimedCache<T> {
    /// Create an empty cache with the given time-to-live.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self {
            value: None,
            fetched_at: None,
            ttl,
        }
    }

    /// Freshness window.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// When the current value was stored, if any.
    #[must_use]
    pub const fn fetched_at(&self) -> Option<Instant> {
        self.fetched_at
    }

    /// Store a value fetched now.
    pub fn store(&mut self, value: T) {
        self.store_at(value, Instant::now());
    }

    /// Store a value fetched at a specific instant.
    pub fn store_at(&mut self, value: T, fetched_at: Instant) {
        self.value = Some(value);
        self.fetched_at = Some(fetched_at);
    }

    /// Drop the cached value.
    pub fn invalidate(&mut self) {
        self.value = None;
        self.fetched_at = None;
    }

    /// True when empty or older than the freshness window.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Instant::now())
    }

    /// Staleness as observed at `now`.
    #[must_use]
    pub fn is_stale_at(&self, now: Instant) -> bool {
        match self.fetched_at {
            Some(fetched_at) if self.value.is_some() => {
                now.saturating_duration_since(fetched_at) > self.ttl
            }
            _ => true,
        }
    }

    /// The cached value regardless of freshness.
    #[must_use]
    pub const fn peek(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// The cached value if it is still fresh.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        if self.is_stale() {
            None
        } else {
            self.value.as_ref()
        }
    }
}

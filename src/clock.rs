//! Time Sources
//!
//! Expiry checks never read the system clock directly. Callers inject either a
//! closure or a [`ClockSource`].

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering::SeqCst;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A source of epoch-second time.
#[derive(Debug, Clone, Default)]
pub enum ClockSource {
    /// The system clock.
    #[default]
    System,
    /// Shared, manually driven time. Clones observe the same value.
    Mock(Arc<AtomicU64>),
}

impl ClockSource {
    /// Create a mock clock starting at `now`.
    pub fn new_mock(now: u64) -> Self {
        ClockSource::Mock(Arc::new(AtomicU64::new(now)))
    }

    /// Seconds since the UNIX epoch. A system clock set before 1970 reads as 0.
    pub fn epoch_seconds(&self) -> u64 {
        match self {
            ClockSource::System => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            ClockSource::Mock(now) => now.load(SeqCst),
        }
    }

    /// Set the time of a mock clock. No effect on the system clock.
    pub fn set_time(&self, now: u64) {
        if let ClockSource::Mock(n) = self {
            n.store(now, SeqCst);
        }
    }

    /// Move a mock clock forward. No effect on the system clock.
    pub fn advance(&self, delta: Duration) {
        if let ClockSource::Mock(n) = self {
            n.fetch_add(delta.as_secs(), SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(ClockSource::System.epoch_seconds() > 1_577_836_800);
    }

    #[test]
    fn test_mock_clock_manipulation() {
        let clock = ClockSource::new_mock(1_000);
        assert_eq!(clock.epoch_seconds(), 1_000);

        clock.set_time(2_000);
        assert_eq!(clock.epoch_seconds(), 2_000);

        clock.advance(Duration::from_secs(30));
        assert_eq!(clock.epoch_seconds(), 2_030);
    }

    #[test]
    fn test_cloned_mocks_share_time() {
        let clock1 = ClockSource::new_mock(10);
        let clock2 = clock1.clone();

        clock1.set_time(42);
        assert_eq!(clock2.epoch_seconds(), 42);
    }

    #[test]
    fn test_system_clock_ignores_set_time() {
        let clock = ClockSource::System;
        clock.set_time(5);
        assert!(clock.epoch_seconds() > 5);
    }
}

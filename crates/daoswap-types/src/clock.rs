//! Time source for the registry.
//!
//! The settlement branch depends on the current time, so the registry reads
//! it through [`Clock`] rather than calling `Utc::now()` directly.

use chrono::{DateTime, Utc};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock. Clones share the same reading.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Clone)]
pub struct ManualClock {
    millis: std::sync::Arc<std::sync::atomic::AtomicI64>,
}

#[cfg(any(test, feature = "test-helpers"))]
impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: std::sync::Arc::new(std::sync::atomic::AtomicI64::new(
                start.timestamp_millis(),
            )),
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.millis
            .store(to.timestamp_millis(), std::sync::atomic::Ordering::SeqCst);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.millis
            .fetch_add(by.num_milliseconds(), std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.millis.load(std::sync::atomic::Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn system_clock_tracks_wall_time() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(now >= before);
    }

    #[test]
    fn manual_clock_is_settable_and_shared() {
        let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let clock = ManualClock::new(start);
        let shared = clock.clone();
        assert_eq!(clock.now(), start);

        shared.advance(Duration::days(1));
        assert_eq!(clock.now(), start + Duration::days(1));

        clock.set(start - Duration::hours(2));
        assert_eq!(shared.now(), start - Duration::hours(2));
    }
}

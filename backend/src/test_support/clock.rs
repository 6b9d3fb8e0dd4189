//! Manually driven clock.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

/// Clock that only moves when told to.
///
/// ```
/// use mockable::Clock;
/// use users_api::test_support::MutableClock;
///
/// let clock = MutableClock::at_epoch_seconds(1_700_000_000);
/// let before = clock.utc();
/// clock.advance_seconds(5);
/// assert_eq!((clock.utc() - before).num_seconds(), 5);
/// ```
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Start at a Unix timestamp; out-of-range input falls back to the epoch.
    pub fn at_epoch_seconds(seconds: i64) -> Self {
        let now = Utc
            .timestamp_opt(seconds, 0)
            .single()
            .unwrap_or_default();
        Self::new(now)
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    /// Jump to `now`, forwards or backwards.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

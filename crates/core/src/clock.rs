//! Time source injected into the store and the rate limiter.

use std::sync::{Arc, Mutex};

use time::macros::format_description;
use time::{Duration, OffsetDateTime, UtcOffset};

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> OffsetDateTime;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// A clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<OffsetDateTime>>,
}

impl ManualClock {
    pub fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn set(&self, to: OffsetDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Render an instant the way timestamps are stored in the table:
/// UTC, millisecond precision, `Z` suffix (`2026-10-15T08:30:00.000Z`).
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let utc = at.to_offset(UtcOffset::UTC);
    utc.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ))
    .unwrap_or_else(|_| utc.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn timestamp_has_millis_and_z() {
        let at = datetime!(2026-10-15 08:30:00.123456 UTC);
        assert_eq!(format_timestamp(at), "2026-10-15T08:30:00.123Z");
    }

    #[test]
    fn timestamp_is_normalized_to_utc() {
        let at = datetime!(2026-10-15 10:30:00 +02:00);
        assert_eq!(format_timestamp(at), "2026-10-15T08:30:00.000Z");
    }

    #[test]
    fn manual_clock_advances_shared() {
        let clock = ManualClock::new(datetime!(2026-01-01 00:00:00 UTC));
        let other = clock.clone();
        clock.advance(Duration::seconds(61));
        assert_eq!(other.now(), datetime!(2026-01-01 00:01:01 UTC));
        other.set(datetime!(2027-01-01 00:00:00 UTC));
        assert_eq!(clock.now().year(), 2027);
    }
}

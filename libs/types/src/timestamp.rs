//! Event timestamps as 100-nanosecond ticks.
//!
//! Build logs store wall-clock time as a tick count since 0001-01-01T00:00:00
//! UTC, one tick per 100 ns. The value is persisted as a fixed-width 64-bit
//! integer so a timestamp always costs eight bytes regardless of magnitude.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Ticks between 0001-01-01 and the Unix epoch.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Ticks per second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

const NANOS_PER_TICK: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp {
    ticks: i64,
}

impl Timestamp {
    pub const MIN: Timestamp = Timestamp { ticks: 0 };

    #[inline]
    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    #[inline]
    pub const fn ticks(self) -> i64 {
        self.ticks
    }

    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Nanoseconds relative to the Unix epoch, truncated to tick precision.
    pub fn from_unix_nanos(nanos: i64) -> Self {
        Self {
            ticks: UNIX_EPOCH_TICKS + nanos.div_euclid(NANOS_PER_TICK),
        }
    }

    pub fn to_unix_nanos(self) -> i64 {
        (self.ticks - UNIX_EPOCH_TICKS).saturating_mul(NANOS_PER_TICK)
    }

    /// Wall-clock view; `None` when the tick count is outside chrono's range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        let since_epoch = self.ticks - UNIX_EPOCH_TICKS;
        let secs = since_epoch.div_euclid(TICKS_PER_SECOND);
        let nanos = since_epoch.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK;
        Utc.timestamp_opt(secs, nanos as u32).single()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        let secs = value.timestamp();
        let sub_ticks = i64::from(value.timestamp_subsec_nanos()) / NANOS_PER_TICK;
        Self {
            ticks: UNIX_EPOCH_TICKS + secs * TICKS_PER_SECOND + sub_ticks,
        }
    }
}

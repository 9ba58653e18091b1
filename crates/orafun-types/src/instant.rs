//! Timezone-agnostic instants and their civil decomposition.
//!
//! An [`Instant`] is a point in time at millisecond resolution with no
//! embedded zone, mirroring how DATE/TIMESTAMP values travel through a SQL
//! engine. Calendar arithmetic never runs on the raw milliseconds: callers
//! decompose under an explicit [`chrono_tz::Tz`] into [`CalendarFields`],
//! operate on the fields, and recompose.
//!
//! Recomposition applies one deterministic rule for daylight-saving
//! anomalies: a local time that occurs twice resolves to the *earlier*
//! mapping, and a local time skipped by a forward transition is shifted
//! one hour later and re-resolved.

use std::fmt;

use chrono::{DateTime, Datelike, LocalResult, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Timelike};
use chrono_tz::Tz;

/// An immutable point in time, millisecond precision, timezone-agnostic.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Instant(i64);

impl Instant {
    /// Construct from milliseconds since the Unix epoch.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub const fn millis(self) -> i64 {
        self.0
    }

    /// The current instant from the system clock.
    ///
    /// Clamps to the epoch if the clock reads earlier than 1970.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn now() -> Self {
        let elapsed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default();
        Self(elapsed.as_millis() as i64)
    }

    /// The civil date and time this instant reads as in `zone`.
    ///
    /// `None` if the instant lies outside the representable year range.
    #[must_use]
    pub fn local_datetime(self, zone: Tz) -> Option<NaiveDateTime> {
        let utc = DateTime::from_timestamp_millis(self.0)?;
        Some(utc.with_timezone(&zone).naive_local())
    }

    /// The instant at which `zone` reads the given civil date and time,
    /// under the module-level daylight-saving rule.
    ///
    /// `None` if the local time cannot be mapped into the representable
    /// range even after gap adjustment.
    #[must_use]
    pub fn from_local_datetime(local: NaiveDateTime, zone: Tz) -> Option<Self> {
        let resolved = match zone.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earlier, _later) => earlier,
            LocalResult::None => {
                let shifted = local.checked_add_signed(TimeDelta::hours(1))?;
                zone.from_local_datetime(&shifted).earliest()?
            }
        };
        Some(Self(resolved.timestamp_millis()))
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::from_timestamp_millis(self.0) {
            Some(utc) => write!(f, "{}", utc.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
            None => write!(f, "epoch-ms({})", self.0),
        }
    }
}

/// Civil calendar fields of an [`Instant`] under a specific zone.
///
/// `month` runs 1–12 and `day` 1–31; the time fields are the local
/// wall-clock reading, so converting back with the same zone recovers the
/// original instant except across daylight-saving anomalies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl CalendarFields {
    /// Decompose an instant under `zone`.
    #[must_use]
    pub fn of(instant: Instant, zone: Tz) -> Option<Self> {
        instant.local_datetime(zone).map(Self::from_naive)
    }

    /// Fields of a civil datetime.
    #[must_use]
    pub fn from_naive(local: NaiveDateTime) -> Self {
        Self {
            year: local.year(),
            month: local.month(),
            day: local.day(),
            hour: local.hour(),
            minute: local.minute(),
            second: local.second(),
            millisecond: local.nanosecond() / 1_000_000,
        }
    }

    /// The civil datetime these fields describe, if they form a valid date.
    #[must_use]
    pub fn naive(self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_milli_opt(
            self.hour,
            self.minute,
            self.second,
            self.millisecond,
        )
    }

    /// Recompose into an instant under `zone`.
    #[must_use]
    pub fn to_instant(self, zone: Tz) -> Option<Instant> {
        Instant::from_local_datetime(self.naive()?, zone)
    }
}

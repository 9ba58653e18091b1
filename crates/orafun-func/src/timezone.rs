//! Oracle session-timezone functions: DBTIMEZONE and SESSIONTIMEZONE.
//!
//! Both report the active UTC offset of a configured zone as `±HH:MM`.
//! The offset is DST-aware, so it depends on the instant it is evaluated
//! at: a function constructed with a pinned instant is deterministic,
//! while the clock-reading variant is not and says so through
//! [`ScalarFunction::is_deterministic`].
//!
//! Formatting truncates: the hour field is the whole-hour part of the
//! offset magnitude, the minute field is the fractional-hour remainder
//! times 60, both zero-padded to two digits.
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use chrono::DateTime;
use chrono_tz::{OffsetComponents, Tz};
use orafun_error::{OraError, Result};
use orafun_types::{Instant, OraValue};
use tracing::debug;

use crate::{FunctionRegistry, ScalarFunction};

// ── Core operation ────────────────────────────────────────────────────────

/// The total UTC offset (base plus daylight saving) of `zone` at `at`,
/// formatted as `±HH:MM`.
pub fn utc_offset_string(zone: Tz, at: Instant) -> Result<String> {
    let utc = DateTime::from_timestamp_millis(at.millis())
        .ok_or_else(|| OraError::date_out_of_range(format!("{at} has no calendar form")))?;
    let local = utc.with_timezone(&zone);
    let offset = local.offset();
    let total_secs =
        offset.base_utc_offset().num_seconds() + offset.dst_offset().num_seconds();
    Ok(format_offset(total_secs))
}

fn format_offset(total_secs: i64) -> String {
    let sign = if total_secs >= 0 { '+' } else { '-' };
    let hours = total_secs.abs() as f64 / 3600.0;
    let whole = hours.trunc() as i64;
    let minutes = ((hours - hours.trunc()) * 60.0).trunc() as i64;
    format!("{sign}{whole:02}:{minutes:02}")
}

/// The process zone from the OS, falling back to UTC when the name is
/// missing or not in the bundled zone database.
#[must_use]
pub fn system_zone() -> Tz {
    match iana_time_zone::get_timezone() {
        Ok(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            debug!(zone = %name, "system zone not in tz database, falling back to UTC");
            chrono_tz::UTC
        }),
        Err(_) => chrono_tz::UTC,
    }
}

// ── DBTIMEZONE ────────────────────────────────────────────────────────────

pub struct DbTimezoneFunc {
    zone: Tz,
    pinned: Option<Instant>,
}

impl DbTimezoneFunc {
    /// Report `zone`'s offset at each call's evaluation time.
    #[must_use]
    pub const fn new(zone: Tz) -> Self {
        Self { zone, pinned: None }
    }

    /// Report `zone`'s offset at a fixed instant (deterministic).
    #[must_use]
    pub const fn pinned(zone: Tz, at: Instant) -> Self {
        Self {
            zone,
            pinned: Some(at),
        }
    }

    /// Report the process zone's offset at each call's evaluation time.
    #[must_use]
    pub fn system() -> Self {
        Self::new(system_zone())
    }
}

impl ScalarFunction for DbTimezoneFunc {
    fn invoke(&self, _args: &[OraValue]) -> Result<OraValue> {
        let at = self.pinned.unwrap_or_else(Instant::now);
        Ok(OraValue::Text(utc_offset_string(self.zone, at)?))
    }

    fn is_deterministic(&self) -> bool {
        self.pinned.is_some()
    }

    fn num_args(&self) -> i32 {
        0
    }

    fn name(&self) -> &str {
        "DBTIMEZONE"
    }
}

// ── SESSIONTIMEZONE ───────────────────────────────────────────────────────

/// Identical contract to [`DbTimezoneFunc`] under the second name Oracle
/// exposes for it.
pub struct SessionTimezoneFunc {
    inner: DbTimezoneFunc,
}

impl SessionTimezoneFunc {
    /// Report `zone`'s offset at each call's evaluation time.
    #[must_use]
    pub const fn new(zone: Tz) -> Self {
        Self {
            inner: DbTimezoneFunc::new(zone),
        }
    }

    /// Report `zone`'s offset at a fixed instant (deterministic).
    #[must_use]
    pub const fn pinned(zone: Tz, at: Instant) -> Self {
        Self {
            inner: DbTimezoneFunc::pinned(zone, at),
        }
    }

    /// Report the process zone's offset at each call's evaluation time.
    #[must_use]
    pub fn system() -> Self {
        Self {
            inner: DbTimezoneFunc::system(),
        }
    }
}

impl ScalarFunction for SessionTimezoneFunc {
    fn invoke(&self, args: &[OraValue]) -> Result<OraValue> {
        self.inner.invoke(args)
    }

    fn is_deterministic(&self) -> bool {
        self.inner.is_deterministic()
    }

    fn num_args(&self) -> i32 {
        0
    }

    fn name(&self) -> &str {
        "SESSIONTIMEZONE"
    }
}

// ── Registration ──────────────────────────────────────────────────────────

/// Register both timezone functions against an explicit zone, evaluated at
/// call time.
pub fn register_timezone_builtins(registry: &mut FunctionRegistry, zone: Tz) {
    registry.register_scalar(DbTimezoneFunc::new(zone));
    registry.register_scalar(SessionTimezoneFunc::new(zone));
}

// ── Tests ─────────────────────────────────────────────────────────────────

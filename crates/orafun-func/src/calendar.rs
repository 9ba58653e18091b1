//! Shared civil-calendar helpers for the date functions.
//!
//! Month arithmetic uses clamped shifts: landing on a shorter month pins
//! the day-of-month to that month's last day instead of spilling into the
//! next month. `chrono`'s `Months` arithmetic has exactly this rule, so
//! the helpers here are thin, checked wrappers over it.

use chrono::{Months, NaiveDateTime};

/// Gregorian leap-year rule.
pub(crate) const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given month (1–12) of the given year.
pub(crate) const fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Linear month count since year 0, for whole-month differences.
pub(crate) fn month_index(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

/// Shift a civil datetime by `n` months (negative allowed), clamping the
/// day-of-month to the target month's length and preserving time-of-day.
///
/// `None` when the magnitude does not fit the month-arithmetic range or
/// the result leaves the representable years.
pub(crate) fn shift_months(local: NaiveDateTime, n: i64) -> Option<NaiveDateTime> {
    let magnitude = u32::try_from(n.unsigned_abs()).ok()?;
    if n >= 0 {
        local.checked_add_months(Months::new(magnitude))
    } else {
        local.checked_sub_months(Months::new(magnitude))
    }
}

/// Floor toward negative infinity at the 8th decimal digit.
pub(crate) fn floor_8(value: f64) -> f64 {
    (value * 1e8).floor() / 1e8
}

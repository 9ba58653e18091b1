//! Oracle date-arithmetic functions: ADD_MONTHS, LAST_DAY, MONTHS_BETWEEN,
//! NEXT_DAY.
//!
//! All four decompose the input instant under an explicit zone, operate on
//! civil fields, and recompose. Month shifts clamp to the target month's
//! last day (Oracle's documented ADD_MONTHS rule). MONTHS_BETWEEN divides
//! the day remainder by the fixed constant 31 — never the true month
//! length — and floors the result at the 8th decimal digit.
//!
//! LAST_DAY preserves the input's time-of-day.
#![allow(clippy::cast_precision_loss)]

use chrono::{Datelike, Days, NaiveDateTime, Weekday};
use chrono_tz::Tz;
use orafun_error::{OraError, Result};
use orafun_types::{CalendarFields, Instant, OraValue};

use crate::calendar::{days_in_month, floor_8, month_index, shift_months};
use crate::{FunctionRegistry, ScalarFunction, want_integer, want_text, want_timestamp};

// ── Weekday names ─────────────────────────────────────────────────────────

/// One locale's weekday vocabulary: an (abbreviated, full) pair per day,
/// Monday first. NEXT_DAY matches either form, case-insensitively.
#[derive(Debug, Clone)]
pub struct WeekdayNames {
    forms: [(String, String); 7],
}

impl WeekdayNames {
    /// Build a table from (abbreviated, full) pairs, Monday first.
    #[must_use]
    pub fn new(forms: [(&str, &str); 7]) -> Self {
        Self {
            forms: forms.map(|(abbr, full)| (abbr.to_owned(), full.to_owned())),
        }
    }

    /// The bundled default: English weekday names.
    #[must_use]
    pub fn english() -> Self {
        Self::new([
            ("Mon", "Monday"),
            ("Tue", "Tuesday"),
            ("Wed", "Wednesday"),
            ("Thu", "Thursday"),
            ("Fri", "Friday"),
            ("Sat", "Saturday"),
            ("Sun", "Sunday"),
        ])
    }

    /// Whether `wanted_lower` (already lowercased) names this weekday in
    /// either form.
    fn matches(&self, weekday: Weekday, wanted_lower: &str) -> bool {
        let (abbr, full) = &self.forms[weekday.num_days_from_monday() as usize];
        abbr.to_lowercase() == wanted_lower || full.to_lowercase() == wanted_lower
    }
}

// ── Core operations ───────────────────────────────────────────────────────

fn local_or_err(date: Instant, zone: Tz) -> Result<NaiveDateTime> {
    date.local_datetime(zone)
        .ok_or_else(|| OraError::date_out_of_range(format!("{date} has no calendar form")))
}

fn recompose(local: NaiveDateTime, zone: Tz) -> Result<Instant> {
    Instant::from_local_datetime(local, zone)
        .ok_or_else(|| OraError::date_out_of_range(format!("{local} is unrepresentable")))
}

/// Shift `date` by `months` calendar months (negative allowed), clamping
/// the day-of-month to the target month's last day and preserving
/// time-of-day.
pub fn add_months(date: Instant, months: i64, zone: Tz) -> Result<Instant> {
    let local = local_or_err(date, zone)?;
    let shifted = shift_months(local, months)
        .ok_or_else(|| OraError::date_out_of_range(format!("{date} + {months} months")))?;
    recompose(shifted, zone)
}

/// The last day of `date`'s month, same year and month, time-of-day
/// preserved from the input.
pub fn last_day(date: Instant, zone: Tz) -> Result<Instant> {
    let mut fields = CalendarFields::of(date, zone)
        .ok_or_else(|| OraError::date_out_of_range(format!("{date} has no calendar form")))?;
    fields.day = days_in_month(fields.year, fields.month);
    fields
        .to_instant(zone)
        .ok_or_else(|| OraError::date_out_of_range(format!("{date} month end is unrepresentable")))
}

/// Months from `date2` to `date1` as `whole_months + whole_days / 31`,
/// floored at the 8th decimal digit. Positive when `date1` is later.
///
/// The whole-month count is clamp-aware: two month-end dates are an exact
/// number of months apart even when the months differ in length.
pub fn months_between(date1: Instant, date2: Instant, zone: Tz) -> Result<f64> {
    let a = local_or_err(date1, zone)?;
    let b = local_or_err(date2, zone)?;

    let shifted = |m: i64| {
        shift_months(b, m).ok_or_else(|| OraError::date_out_of_range(format!("{date2} + {m} months")))
    };

    let mut months = month_index(a.year(), a.month()) - month_index(b.year(), b.month());
    let mut base = shifted(months)?;
    if a >= b {
        if base > a {
            months -= 1;
            base = shifted(months)?;
        }
    } else if base < a {
        months += 1;
        base = shifted(months)?;
    }

    let days = (a - base).num_days();
    Ok(floor_8(months as f64 + days as f64 / 31.0))
}

/// The first calendar day strictly after `date` whose weekday name matches
/// `day` (abbreviated or full form, case-insensitive), time-of-day
/// preserved.
///
/// A name matching none of the seven candidates is an error; there is no
/// fallback value.
pub fn next_day(date: Instant, day: &str, zone: Tz, names: &WeekdayNames) -> Result<Instant> {
    let local = local_or_err(date, zone)?;
    let wanted = day.trim().to_lowercase();
    for offset in 1..=7 {
        let candidate = local
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| OraError::date_out_of_range(format!("{date} + {offset} days")))?;
        if names.matches(candidate.weekday(), &wanted) {
            return recompose(candidate, zone);
        }
    }
    Err(OraError::not_valid_day(day))
}

// ── ADD_MONTHS ────────────────────────────────────────────────────────────

pub struct AddMonthsFunc {
    zone: Tz,
}

impl AddMonthsFunc {
    #[must_use]
    pub const fn new(zone: Tz) -> Self {
        Self { zone }
    }
}

impl ScalarFunction for AddMonthsFunc {
    fn invoke(&self, args: &[OraValue]) -> Result<OraValue> {
        let date = want_timestamp("ADD_MONTHS", args, 0)?;
        let months = want_integer("ADD_MONTHS", args, 1)?;
        Ok(OraValue::Timestamp(add_months(date, months, self.zone)?))
    }

    fn num_args(&self) -> i32 {
        2
    }

    fn name(&self) -> &str {
        "ADD_MONTHS"
    }
}

// ── LAST_DAY ──────────────────────────────────────────────────────────────

pub struct LastDayFunc {
    zone: Tz,
}

impl LastDayFunc {
    #[must_use]
    pub const fn new(zone: Tz) -> Self {
        Self { zone }
    }
}

impl ScalarFunction for LastDayFunc {
    fn invoke(&self, args: &[OraValue]) -> Result<OraValue> {
        let date = want_timestamp("LAST_DAY", args, 0)?;
        Ok(OraValue::Timestamp(last_day(date, self.zone)?))
    }

    fn num_args(&self) -> i32 {
        1
    }

    fn name(&self) -> &str {
        "LAST_DAY"
    }
}

// ── MONTHS_BETWEEN ────────────────────────────────────────────────────────

pub struct MonthsBetweenFunc {
    zone: Tz,
}

impl MonthsBetweenFunc {
    #[must_use]
    pub const fn new(zone: Tz) -> Self {
        Self { zone }
    }
}

impl ScalarFunction for MonthsBetweenFunc {
    fn invoke(&self, args: &[OraValue]) -> Result<OraValue> {
        let date1 = want_timestamp("MONTHS_BETWEEN", args, 0)?;
        let date2 = want_timestamp("MONTHS_BETWEEN", args, 1)?;
        Ok(OraValue::Float(months_between(date1, date2, self.zone)?))
    }

    fn num_args(&self) -> i32 {
        2
    }

    fn name(&self) -> &str {
        "MONTHS_BETWEEN"
    }
}

// ── NEXT_DAY ──────────────────────────────────────────────────────────────

pub struct NextDayFunc {
    zone: Tz,
    names: WeekdayNames,
}

impl NextDayFunc {
    #[must_use]
    pub const fn new(zone: Tz, names: WeekdayNames) -> Self {
        Self { zone, names }
    }
}

impl ScalarFunction for NextDayFunc {
    fn invoke(&self, args: &[OraValue]) -> Result<OraValue> {
        let date = want_timestamp("NEXT_DAY", args, 0)?;
        let day = want_text("NEXT_DAY", args, 1)?;
        Ok(OraValue::Timestamp(next_day(
            date,
            day,
            self.zone,
            &self.names,
        )?))
    }

    fn num_args(&self) -> i32 {
        2
    }

    fn name(&self) -> &str {
        "NEXT_DAY"
    }
}

// ── Registration ──────────────────────────────────────────────────────────

/// Register the four date-arithmetic functions with an explicit zone and
/// weekday-name table.
pub fn register_datetime_builtins(
    registry: &mut FunctionRegistry,
    zone: Tz,
    names: &WeekdayNames,
) {
    registry.register_scalar(AddMonthsFunc::new(zone));
    registry.register_scalar(LastDayFunc::new(zone));
    registry.register_scalar(MonthsBetweenFunc::new(zone));
    registry.register_scalar(NextDayFunc::new(zone, names.clone()));
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use chrono_tz::UTC;

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Instant {
        Instant::from_local_datetime(
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_opt(h, mi, s)
                .unwrap(),
            UTC,
        )
        .unwrap()
    }

    fn at_milli(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> Instant {
        Instant::from_local_datetime(
            NaiveDate::from_ymd_opt(y, mo, d)
                .unwrap()
                .and_hms_milli_opt(h, mi, s, ms)
                .unwrap(),
            UTC,
        )
        .unwrap()
    }

    fn midnight(y: i32, mo: u32, d: u32) -> Instant {
        at(y, mo, d, 0, 0, 0)
    }

    // ── add_months ────────────────────────────────────────────────────

    #[test]
    fn test_add_months_across_year_boundary() {
        assert_eq!(
            add_months(midnight(2000, 12, 1), 1, UTC).unwrap(),
            midnight(2001, 1, 1)
        );
        assert_eq!(
            add_months(midnight(2000, 1, 1), -1, UTC).unwrap(),
            midnight(1999, 12, 1)
        );
    }

    #[test]
    fn test_add_months_preserves_time_of_day() {
        assert_eq!(
            add_months(at_milli(2000, 1, 1, 12, 34, 56, 789), 1, UTC).unwrap(),
            at_milli(2000, 2, 1, 12, 34, 56, 789)
        );
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(
            add_months(midnight(2024, 1, 31), 1, UTC).unwrap(),
            midnight(2024, 2, 29)
        );
        assert_eq!(
            add_months(midnight(2023, 1, 31), 1, UTC).unwrap(),
            midnight(2023, 2, 28)
        );
        assert_eq!(
            add_months(midnight(2000, 3, 31), -1, UTC).unwrap(),
            midnight(2000, 2, 29)
        );
    }

    #[test]
    fn test_add_months_roundtrip_away_from_month_end() {
        let d = midnight(2024, 3, 15);
        let there = add_months(d, 7, UTC).unwrap();
        assert_eq!(add_months(there, -7, UTC).unwrap(), d);
    }

    #[test]
    fn test_add_months_roundtrip_lost_at_clamp() {
        // Jan 31 + 1 month clamps to Feb 29, and coming back lands on
        // Jan 29, not Jan 31.
        let d = midnight(2024, 1, 31);
        let there = add_months(d, 1, UTC).unwrap();
        assert_eq!(add_months(there, -1, UTC).unwrap(), midnight(2024, 1, 29));
    }

    #[test]
    fn test_add_months_zero_is_identity() {
        let d = at_milli(2024, 2, 29, 23, 59, 59, 999);
        assert_eq!(add_months(d, 0, UTC).unwrap(), d);
    }

    #[test]
    fn test_add_months_out_of_range() {
        let err = add_months(midnight(2000, 1, 1), i64::MAX, UTC).unwrap_err();
        assert!(matches!(err, OraError::DateOutOfRange { .. }));
    }

    // ── last_day ──────────────────────────────────────────────────────

    #[test]
    fn test_last_day_month_lengths() {
        assert_eq!(
            last_day(midnight(2000, 1, 1), UTC).unwrap(),
            midnight(2000, 1, 31)
        );
        assert_eq!(
            last_day(midnight(2000, 2, 11), UTC).unwrap(),
            midnight(2000, 2, 29)
        );
        assert_eq!(
            last_day(midnight(2000, 4, 21), UTC).unwrap(),
            midnight(2000, 4, 30)
        );
    }

    #[test]
    fn test_last_day_preserves_time_of_day() {
        assert_eq!(
            last_day(at(2000, 1, 1, 8, 30, 15), UTC).unwrap(),
            at(2000, 1, 31, 8, 30, 15)
        );
    }

    #[test]
    fn test_last_day_idempotent() {
        let once = last_day(at(2024, 2, 3, 6, 0, 0), UTC).unwrap();
        assert_eq!(last_day(once, UTC).unwrap(), once);
    }

    // ── months_between ────────────────────────────────────────────────

    #[test]
    fn test_months_between_fractional() {
        let r = months_between(midnight(1995, 2, 2), midnight(1995, 1, 1), UTC).unwrap();
        assert_eq!(r, 1.032_258_06);
    }

    #[test]
    fn test_months_between_both_month_ends_is_whole() {
        let r = months_between(midnight(1995, 2, 28), midnight(1995, 1, 31), UTC).unwrap();
        assert_eq!(r, 1.0);
    }

    #[test]
    fn test_months_between_negative_whole() {
        let r = months_between(midnight(1994, 12, 31), midnight(1995, 1, 31), UTC).unwrap();
        assert_eq!(r, -1.0);
    }

    #[test]
    fn test_months_between_same_instant_is_zero() {
        let d = at(2024, 7, 19, 13, 45, 0);
        assert_eq!(months_between(d, d, UTC).unwrap(), 0.0);
    }

    #[test]
    fn test_months_between_antisymmetric_on_whole_months() {
        let a = midnight(1995, 2, 28);
        let b = midnight(1995, 1, 31);
        let fwd = months_between(a, b, UTC).unwrap();
        let back = months_between(b, a, UTC).unwrap();
        assert_eq!(fwd, -back);
    }

    #[test]
    fn test_months_between_floor_on_negative_fraction() {
        // The 8-digit floor rounds toward negative infinity, so the
        // reversed fractional case gains one ulp of magnitude.
        let r = months_between(midnight(1995, 1, 1), midnight(1995, 2, 2), UTC).unwrap();
        assert_eq!(r, -1.032_258_07);
    }

    #[test]
    fn test_months_between_day_remainder_uses_31() {
        // Jan 31 -> Mar 30 is one clamped month (to Feb 28) plus 30 days,
        // and the divisor stays 31 regardless of February's length.
        let r = months_between(midnight(1995, 3, 30), midnight(1995, 1, 31), UTC).unwrap();
        assert_eq!(r, 1.967_741_93);
    }

    #[test]
    fn test_months_between_ignores_partial_days() {
        // 12 hours short of a full month counts as zero whole months plus
        // 27 whole days.
        let r = months_between(
            at(1995, 2, 28, 0, 0, 0),
            at(1995, 1, 31, 12, 0, 0),
            UTC,
        )
        .unwrap();
        assert_eq!(r, floor_8(27.0 / 31.0));
    }

    // ── next_day ──────────────────────────────────────────────────────

    #[test]
    fn test_next_day_full_name() {
        // 2009-10-15 is a Thursday; the next Tuesday is the 20th.
        let r = next_day(
            midnight(2009, 10, 15),
            "TUESDAY",
            UTC,
            &WeekdayNames::english(),
        )
        .unwrap();
        assert_eq!(r, midnight(2009, 10, 20));
    }

    #[test]
    fn test_next_day_abbreviated_and_mixed_case() {
        let names = WeekdayNames::english();
        let d = midnight(2009, 10, 15);
        assert_eq!(
            next_day(d, "tue", UTC, &names).unwrap(),
            midnight(2009, 10, 20)
        );
        assert_eq!(
            next_day(d, "Tuesday", UTC, &names).unwrap(),
            midnight(2009, 10, 20)
        );
    }

    #[test]
    fn test_next_day_same_weekday_advances_full_week() {
        let r = next_day(
            midnight(2009, 10, 15),
            "THURSDAY",
            UTC,
            &WeekdayNames::english(),
        )
        .unwrap();
        assert_eq!(r, midnight(2009, 10, 22));
    }

    #[test]
    fn test_next_day_preserves_time_of_day() {
        let r = next_day(
            at(2009, 10, 15, 9, 15, 30),
            "FRIDAY",
            UTC,
            &WeekdayNames::english(),
        )
        .unwrap();
        assert_eq!(r, at(2009, 10, 16, 9, 15, 30));
    }

    #[test]
    fn test_next_day_invalid_name_is_an_error() {
        let err = next_day(
            midnight(2009, 10, 15),
            "SMARCHDAY",
            UTC,
            &WeekdayNames::english(),
        )
        .unwrap_err();
        assert!(matches!(err, OraError::NotValidDay { name } if name == "SMARCHDAY"));
    }

    #[test]
    fn test_next_day_localized_table() {
        let japanese = WeekdayNames::new([
            ("月", "月曜日"),
            ("火", "火曜日"),
            ("水", "水曜日"),
            ("木", "木曜日"),
            ("金", "金曜日"),
            ("土", "土曜日"),
            ("日", "日曜日"),
        ]);
        let r = next_day(midnight(2009, 10, 15), "火", UTC, &japanese).unwrap();
        assert_eq!(r, midnight(2009, 10, 20));
    }

    // ── Function objects ──────────────────────────────────────────────

    #[test]
    fn test_add_months_func_invoke() {
        let f = AddMonthsFunc::new(UTC);
        let r = f
            .invoke(&[
                OraValue::Timestamp(midnight(2000, 12, 1)),
                OraValue::Integer(1),
            ])
            .unwrap();
        assert_eq!(r, OraValue::Timestamp(midnight(2001, 1, 1)));
    }

    #[test]
    fn test_add_months_func_null_argument() {
        let f = AddMonthsFunc::new(UTC);
        let err = f
            .invoke(&[OraValue::Null, OraValue::Integer(1)])
            .unwrap_err();
        assert!(matches!(
            err,
            OraError::NullArgument {
                function: "ADD_MONTHS"
            }
        ));
    }

    #[test]
    fn test_add_months_func_type_mismatch() {
        let f = AddMonthsFunc::new(UTC);
        let err = f
            .invoke(&[
                OraValue::Text("2000-01-01".to_owned()),
                OraValue::Integer(1),
            ])
            .unwrap_err();
        assert!(matches!(
            err,
            OraError::TypeMismatch {
                expected: "TIMESTAMP",
                actual: "TEXT",
                ..
            }
        ));
    }

    #[test]
    fn test_months_between_func_returns_float() {
        let f = MonthsBetweenFunc::new(UTC);
        let r = f
            .invoke(&[
                OraValue::Timestamp(midnight(1995, 2, 2)),
                OraValue::Timestamp(midnight(1995, 1, 1)),
            ])
            .unwrap();
        assert_eq!(r, OraValue::Float(1.032_258_06));
    }

    #[test]
    fn test_next_day_func_invoke() {
        let f = NextDayFunc::new(UTC, WeekdayNames::english());
        let r = f
            .invoke(&[
                OraValue::Timestamp(midnight(2009, 10, 15)),
                OraValue::Text("TUESDAY".to_owned()),
            ])
            .unwrap();
        assert_eq!(r, OraValue::Timestamp(midnight(2009, 10, 20)));
    }

    #[test]
    fn test_register_datetime_builtins_all_present() {
        let mut reg = FunctionRegistry::new();
        register_datetime_builtins(&mut reg, UTC, &WeekdayNames::english());
        assert!(reg.find_scalar("add_months", 2).is_some());
        assert!(reg.find_scalar("LAST_DAY", 1).is_some());
        assert!(reg.find_scalar("months_between", 2).is_some());
        assert!(reg.find_scalar("NEXT_DAY", 2).is_some());
    }
}

//! Oracle-compatible scalar SQL functions and a registry to expose them.
//!
//! This crate defines:
//! - an open, user-implementable [`ScalarFunction`] trait
//! - a small in-memory [`FunctionRegistry`] for registering and resolving
//!   functions by `(name, num_args)` key with variadic fallback
//! - the nine Oracle builtins: ADD_MONTHS, ASCIISTR, BIN_TO_NUM, COMPOSE,
//!   DBTIMEZONE, LAST_DAY, MONTHS_BETWEEN, NEXT_DAY, SESSIONTIMEZONE,
//!   TRANSLATE
//!
//! Ambient context (timezone, weekday names, the clock) never enters the
//! core algorithms implicitly: every function that needs calendar or
//! locale context is constructed with explicit values.
//! [`register_oracle_builtins_with_defaults`] is the one boundary where
//! process defaults are resolved.
#![allow(clippy::unnecessary_literal_bound)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono_tz::Tz;
use orafun_error::{OraError, Result};
use orafun_types::{Instant, OraValue};
use tracing::debug;

mod calendar;
pub mod datetime;
pub mod numeric;
pub mod scalar;
pub mod strings;
pub mod timezone;

pub use datetime::{
    AddMonthsFunc, LastDayFunc, MonthsBetweenFunc, NextDayFunc, WeekdayNames,
    register_datetime_builtins,
};
pub use numeric::{BinToNumFunc, register_numeric_builtins};
pub use scalar::ScalarFunction;
pub use strings::{
    AsciistrFunc, ComposeFunc, TranslateFunc, UnistrFunc, register_string_builtins,
};
pub use timezone::{
    DbTimezoneFunc, SessionTimezoneFunc, register_timezone_builtins, system_zone,
};

/// Composite lookup key for functions: `(UPPERCASE name, num_args)`.
///
/// `-1` for `num_args` means variadic (any number of arguments).
/// Names are stored as uppercase ASCII for case-insensitive matching.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct FunctionKey {
    /// Function name, stored as uppercase ASCII.
    pub name: String,
    /// Expected argument count, or `-1` for variadic.
    pub num_args: i32,
}

impl FunctionKey {
    /// Create a new function key with the name canonicalized to uppercase.
    #[must_use]
    pub fn new(name: &str, num_args: i32) -> Self {
        Self {
            name: canonical_name(name),
            num_args,
        }
    }
}

/// Registry for scalar functions, keyed by `(name, num_args)`.
///
/// Lookup strategy:
/// 1. Exact match on `(UPPERCASE_NAME, num_args)`.
/// 2. Fallback to variadic version `(UPPERCASE_NAME, -1)`.
/// 3. `None` if neither found (caller should raise "no such function").
#[derive(Default)]
pub struct FunctionRegistry {
    scalars: HashMap<FunctionKey, Arc<dyn ScalarFunction>>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scalar function, keyed by `(name, num_args)`.
    ///
    /// Overwrites any existing function with the same key. Returns the
    /// previous function if one existed.
    pub fn register_scalar<F>(&mut self, function: F) -> Option<Arc<dyn ScalarFunction>>
    where
        F: ScalarFunction + 'static,
    {
        let key = FunctionKey::new(function.name(), function.num_args());
        self.scalars.insert(key, Arc::new(function))
    }

    /// Look up a scalar function by `(name, num_args)`.
    ///
    /// Tries exact match first, then falls back to the variadic version
    /// `(name, -1)` if no exact match exists.
    #[must_use]
    pub fn find_scalar(&self, name: &str, num_args: i32) -> Option<Arc<dyn ScalarFunction>> {
        let canon = canonical_name(name);
        let exact = FunctionKey {
            name: canon.clone(),
            num_args,
        };
        if let Some(f) = self.scalars.get(&exact) {
            debug!(name = %canon, arity = num_args, hit = "exact", "registry lookup");
            return Some(Arc::clone(f));
        }
        // Variadic fallback
        let variadic = FunctionKey {
            name: canon.clone(),
            num_args: -1,
        };
        let result = self.scalars.get(&variadic).map(Arc::clone);
        debug!(
            name = %canon,
            arity = num_args,
            hit = if result.is_some() { "variadic" } else { "miss" },
            "registry lookup"
        );
        result
    }

    /// Whether the registry contains any function with this name
    /// (any arg count).
    #[must_use]
    pub fn contains_scalar(&self, name: &str) -> bool {
        let canon = canonical_name(name);
        self.scalars.keys().any(|k| k.name == canon)
    }
}

fn canonical_name(name: &str) -> String {
    name.trim().to_ascii_uppercase()
}

// ── Argument helpers ──────────────────────────────────────────────────────
//
// Strict extraction: NULL fails fast, and no implicit conversions are
// applied between value kinds.

pub(crate) fn want_timestamp(
    function: &'static str,
    args: &[OraValue],
    idx: usize,
) -> Result<Instant> {
    match &args[idx] {
        OraValue::Timestamp(t) => Ok(*t),
        OraValue::Null => Err(OraError::null_argument(function)),
        other => Err(OraError::type_mismatch(
            function,
            "TIMESTAMP",
            other.type_name(),
        )),
    }
}

pub(crate) fn want_integer(function: &'static str, args: &[OraValue], idx: usize) -> Result<i64> {
    match &args[idx] {
        OraValue::Integer(i) => Ok(*i),
        OraValue::Null => Err(OraError::null_argument(function)),
        other => Err(OraError::type_mismatch(
            function,
            "INTEGER",
            other.type_name(),
        )),
    }
}

pub(crate) fn want_text<'a>(
    function: &'static str,
    args: &'a [OraValue],
    idx: usize,
) -> Result<&'a str> {
    match &args[idx] {
        OraValue::Text(s) => Ok(s),
        OraValue::Null => Err(OraError::null_argument(function)),
        other => Err(OraError::type_mismatch(
            function,
            "TEXT",
            other.type_name(),
        )),
    }
}

// ── Builtin registration ──────────────────────────────────────────────────

/// Register all Oracle builtins against explicit calendar context.
pub fn register_oracle_builtins(registry: &mut FunctionRegistry, zone: Tz, names: &WeekdayNames) {
    register_datetime_builtins(registry, zone, names);
    register_string_builtins(registry);
    register_numeric_builtins(registry);
    register_timezone_builtins(registry, zone);
    debug!(zone = %zone, "registered Oracle builtins");
}

/// Register all Oracle builtins using process defaults: the OS timezone
/// (UTC fallback) and English weekday names.
///
/// This is the only place ambient configuration is read; everything below
/// it takes explicit values.
pub fn register_oracle_builtins_with_defaults(registry: &mut FunctionRegistry) {
    register_oracle_builtins(registry, system_zone(), &WeekdayNames::english());
}

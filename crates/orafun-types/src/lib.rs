//! Value and temporal model shared by the Oracle-compatible function crates.
//!
//! Defines [`OraValue`], the dynamically-typed value exchanged with the host
//! SQL engine, and the temporal pair [`Instant`] / [`CalendarFields`]:
//! a timezone-agnostic epoch-millisecond point in time, and its civil
//! decomposition under an explicit IANA zone.

pub mod instant;
pub mod value;

pub use instant::{CalendarFields, Instant};
pub use value::OraValue;

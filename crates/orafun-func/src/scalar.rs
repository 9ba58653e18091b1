//! Scalar (row-level) function trait.
//!
//! Scalar functions compute a single output value from zero or more input
//! values. They are stateless across rows: each invocation is independent.
//!
//! This trait is **open** (user-implementable): a host engine can register
//! its own functions next to the Oracle-compatible builtins.
//!
//! # Send + Sync
//!
//! Scalar functions may be shared across threads via `Arc` for use by
//! concurrent query executors. Implementations must be thread-safe; the
//! builtins achieve this by capturing all ambient context (zone, weekday
//! names, pinned instant) as immutable fields at construction time.

use orafun_error::Result;
use orafun_types::OraValue;

/// A scalar (row-level) SQL function.
///
/// Stored in the [`FunctionRegistry`](crate::FunctionRegistry) as
/// `Arc<dyn ScalarFunction>`.
///
/// # Error Handling
///
/// Failures are reported synchronously as [`OraError`](orafun_error::OraError)
/// variants; nothing is retried internally. NULL arguments fail fast with
/// [`OraError::NullArgument`](orafun_error::OraError::NullArgument).
pub trait ScalarFunction: Send + Sync {
    /// Execute this function on the given arguments.
    fn invoke(&self, args: &[OraValue]) -> Result<OraValue>;

    /// Whether this function is deterministic (same inputs → same output).
    ///
    /// Deterministic functions enable constant folding and other query
    /// planner optimizations. Defaults to `true`; functions that read the
    /// system clock override this.
    fn is_deterministic(&self) -> bool {
        true
    }

    /// The number of arguments this function accepts.
    ///
    /// `-1` means variadic (any number of arguments).
    fn num_args(&self) -> i32;

    /// The function name, used for registration and in error messages.
    fn name(&self) -> &str;
}

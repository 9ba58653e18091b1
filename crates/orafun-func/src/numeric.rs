//! Oracle bit-vector function: BIN_TO_NUM.
//!
//! Folds a variadic sequence of 0/1 integers, most-significant first,
//! into a 64-bit signed integer. Anything other than a literal 0 or 1 is
//! rejected, and overflow past i64 is reported instead of wrapped.

use orafun_error::{OraError, Result};
use orafun_types::OraValue;

use crate::{FunctionRegistry, ScalarFunction, want_integer};

// ── Core operation ────────────────────────────────────────────────────────

/// Parse a most-significant-first sequence of binary digits into an i64.
pub fn bin_to_num(bits: &[i64]) -> Result<i64> {
    if bits.is_empty() {
        return Err(OraError::invalid_number(
            "BIN_TO_NUM requires at least one binary digit",
        ));
    }
    let mut acc: i64 = 0;
    for &bit in bits {
        if bit != 0 && bit != 1 {
            return Err(OraError::invalid_number(format!(
                "'{bit}' is not a binary digit"
            )));
        }
        acc = acc
            .checked_mul(2)
            .and_then(|v| v.checked_add(bit))
            .ok_or(OraError::NumericOverflow)?;
    }
    Ok(acc)
}

// ── BIN_TO_NUM ────────────────────────────────────────────────────────────

pub struct BinToNumFunc;

impl ScalarFunction for BinToNumFunc {
    fn invoke(&self, args: &[OraValue]) -> Result<OraValue> {
        let mut bits = Vec::with_capacity(args.len());
        for i in 0..args.len() {
            bits.push(want_integer("BIN_TO_NUM", args, i)?);
        }
        Ok(OraValue::Integer(bin_to_num(&bits)?))
    }

    fn num_args(&self) -> i32 {
        -1
    }

    fn name(&self) -> &str {
        "BIN_TO_NUM"
    }
}

// ── Registration ──────────────────────────────────────────────────────────

/// Register the numeric-encoding function.
pub fn register_numeric_builtins(registry: &mut FunctionRegistry) {
    registry.register_scalar(BinToNumFunc);
}

// ── Tests ─────────────────────────────────────────────────────────────────

//! Oracle text functions: ASCIISTR, UNISTR, COMPOSE, TRANSLATE.
//!
//! ASCIISTR and UNISTR operate per UTF-16 **code unit**, not per
//! codepoint: a supplementary-plane character escapes as two independent
//! `\HHHH` sequences, and UNISTR decodes each escape to exactly one code
//! unit. COMPOSE applies Unicode canonical composition (NFC); canonical
//! decomposition is out of scope.
#![allow(clippy::cast_possible_truncation)]

use std::fmt::Write as _;

use icu_normalizer::ComposingNormalizer;
use orafun_error::{OraError, Result};
use orafun_types::OraValue;

use crate::{FunctionRegistry, ScalarFunction, want_text};

// ── Core operations ───────────────────────────────────────────────────────

/// Escape every UTF-16 code unit above 0x7F as `\` plus four uppercase
/// hex digits; ASCII code units pass through unchanged.
#[must_use]
pub fn asciistr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for unit in input.encode_utf16() {
        if unit <= 0x7F {
            out.push(char::from(unit as u8));
        } else {
            let _ = write!(out, "\\{unit:04X}");
        }
    }
    out
}

fn hex_digit(unit: u16) -> Option<u16> {
    let c = char::from(u8::try_from(unit).ok()?);
    c.to_digit(16).map(|d| d as u16)
}

/// Decode `\HHHH` escapes (hex digits of either case) back into UTF-16
/// code units; every other code unit passes through unchanged.
///
/// Fails with [`OraError::MalformedEscape`] when fewer than four code
/// units follow a backslash, when any of them is not a hex digit, or when
/// the decoded sequence contains an unpaired surrogate and therefore has
/// no string representation.
pub fn unistr(input: &str) -> Result<String> {
    const BACKSLASH: u16 = b'\\' as u16;

    let units: Vec<u16> = input.encode_utf16().collect();
    let mut decoded: Vec<u16> = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        if units[i] == BACKSLASH {
            if i + 5 > units.len() {
                return Err(OraError::malformed_escape(i, "truncated \\HHHH escape"));
            }
            let mut value: u16 = 0;
            for &unit in &units[i + 1..i + 5] {
                let digit = hex_digit(unit).ok_or_else(|| {
                    OraError::malformed_escape(i, "non-hex digit in \\HHHH escape")
                })?;
                value = (value << 4) | digit;
            }
            decoded.push(value);
            i += 5;
        } else {
            decoded.push(units[i]);
            i += 1;
        }
    }
    String::from_utf16(&decoded)
        .map_err(|_| OraError::malformed_escape(0, "escape decodes to an unpaired surrogate"))
}

/// Unicode canonical composition (NFC).
#[must_use]
pub fn compose(input: &str) -> String {
    let normalizer = ComposingNormalizer::new_nfc();
    normalizer.normalize(input).to_string()
}

/// Character-by-character substitution with deletion semantics.
///
/// Doubled single quotes collapse to one in all three arguments first (a
/// SQL literal-quoting artifact kept for compatibility). Then each
/// character of `from` is processed left to right against the *running*
/// result: position `i` of `from` maps to position `i` of `to`, or to
/// deletion when `to` is shorter. Later `from` characters see the output
/// of earlier substitutions, so `translate("ab", "ab", "ba")` is `"aa"`.
#[must_use]
pub fn translate(expr: &str, from: &str, to: &str) -> String {
    let mut result = expr.replace("''", "'");
    let from = from.replace("''", "'");
    let to = to.replace("''", "'");
    let to_chars: Vec<char> = to.chars().collect();
    for (i, cf) in from.chars().enumerate() {
        result = match to_chars.get(i) {
            Some(&ct) => result.replace(cf, &ct.to_string()),
            None => result.replace(cf, ""),
        };
    }
    result
}

// ── ASCIISTR ──────────────────────────────────────────────────────────────

pub struct AsciistrFunc;

impl ScalarFunction for AsciistrFunc {
    fn invoke(&self, args: &[OraValue]) -> Result<OraValue> {
        let input = want_text("ASCIISTR", args, 0)?;
        Ok(OraValue::Text(asciistr(input)))
    }

    fn num_args(&self) -> i32 {
        1
    }

    fn name(&self) -> &str {
        "ASCIISTR"
    }
}

// ── UNISTR ────────────────────────────────────────────────────────────────

pub struct UnistrFunc;

impl ScalarFunction for UnistrFunc {
    fn invoke(&self, args: &[OraValue]) -> Result<OraValue> {
        let input = want_text("UNISTR", args, 0)?;
        Ok(OraValue::Text(unistr(input)?))
    }

    fn num_args(&self) -> i32 {
        1
    }

    fn name(&self) -> &str {
        "UNISTR"
    }
}

// ── COMPOSE ───────────────────────────────────────────────────────────────

pub struct ComposeFunc;

impl ScalarFunction for ComposeFunc {
    fn invoke(&self, args: &[OraValue]) -> Result<OraValue> {
        let input = want_text("COMPOSE", args, 0)?;
        Ok(OraValue::Text(compose(input)))
    }

    fn num_args(&self) -> i32 {
        1
    }

    fn name(&self) -> &str {
        "COMPOSE"
    }
}

// ── TRANSLATE ─────────────────────────────────────────────────────────────

pub struct TranslateFunc;

impl ScalarFunction for TranslateFunc {
    fn invoke(&self, args: &[OraValue]) -> Result<OraValue> {
        let expr = want_text("TRANSLATE", args, 0)?;
        let from = want_text("TRANSLATE", args, 1)?;
        let to = want_text("TRANSLATE", args, 2)?;
        Ok(OraValue::Text(translate(expr, from, to)))
    }

    fn num_args(&self) -> i32 {
        3
    }

    fn name(&self) -> &str {
        "TRANSLATE"
    }
}

// ── Registration ──────────────────────────────────────────────────────────

/// Register the four text functions.
pub fn register_string_builtins(registry: &mut FunctionRegistry) {
    registry.register_scalar(AsciistrFunc);
    registry.register_scalar(UnistrFunc);
    registry.register_scalar(ComposeFunc);
    registry.register_scalar(TranslateFunc);
}

// ── Tests ─────────────────────────────────────────────────────────────────

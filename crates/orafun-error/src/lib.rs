use thiserror::Error;

/// Primary error type for Oracle-compatible function evaluation.
///
/// Structured variants for every failure mode a function can report, so
/// callers can match on the kind instead of inspecting message strings.
/// The host SQL engine is responsible for turning these into user-visible
/// SQL errors; [`OraError::error_code`] supplies the matching ORA number
/// where Oracle documents one.
#[derive(Error, Debug)]
pub enum OraError {
    // === Input errors ===
    /// A required argument was SQL NULL.
    #[error("null argument to {function}")]
    NullArgument { function: &'static str },

    /// The host passed a value of the wrong kind.
    #[error("{function}: inconsistent datatypes: expected {expected}, got {actual}")]
    TypeMismatch {
        function: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    // === Text decoding errors ===
    /// A `\HHHH` escape was truncated or contained a non-hex digit.
    #[error("malformed \\HHHH escape at code unit {offset}: {detail}")]
    MalformedEscape { offset: usize, detail: String },

    // === Numeric errors ===
    /// A value could not be interpreted as a number in the expected format.
    #[error("invalid number: {detail}")]
    InvalidNumber { detail: String },

    /// The magnitude of a result exceeds the 64-bit signed integer range.
    #[error("numeric overflow")]
    NumericOverflow,

    // === Calendar errors ===
    /// A day name matched none of the weekday forms in the active table.
    #[error("'{name}' is not a valid day of the week")]
    NotValidDay { name: String },

    /// Date arithmetic produced a date outside the supported year range.
    #[error("date arithmetic out of range: {detail}")]
    DateOutOfRange { detail: String },

    /// A timezone region name was not found in the zone database.
    #[error("timezone region not found: '{name}'")]
    UnknownTimeZone { name: String },

    // === Residual ===
    /// Function domain/runtime error not covered by a structured variant.
    #[error("{0}")]
    FunctionError(String),
}

/// ORA error numbers for host-engine compatibility.
///
/// Numeric values match the codes Oracle documents for the corresponding
/// conditions (e.g. ORA-01722, ORA-01846); conditions Oracle has no
/// dedicated number for map to the generic value-error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum OraCode {
    /// Successful result.
    Success = 0,
    /// Inconsistent datatypes.
    InconsistentDatatypes = 932,
    /// Fetched or supplied value is NULL.
    NullValue = 1405,
    /// Numeric overflow.
    NumericOverflow = 1426,
    /// Invalid hex number.
    InvalidHex = 1465,
    /// Invalid number.
    InvalidNumber = 1722,
    /// Date out of the supported range.
    DateOutOfRange = 1841,
    /// Not a valid day of the week.
    NotValidDayOfWeek = 1846,
    /// Timezone region not found.
    TimezoneRegionNotFound = 1882,
    /// Numeric or value error (generic).
    ValueError = 6502,
}

impl OraError {
    /// Map this error to an ORA number for host compatibility.
    #[must_use]
    pub const fn error_code(&self) -> OraCode {
        match self {
            Self::NullArgument { .. } => OraCode::NullValue,
            Self::TypeMismatch { .. } => OraCode::InconsistentDatatypes,
            Self::MalformedEscape { .. } => OraCode::InvalidHex,
            Self::InvalidNumber { .. } => OraCode::InvalidNumber,
            Self::NumericOverflow => OraCode::NumericOverflow,
            Self::NotValidDay { .. } => OraCode::NotValidDayOfWeek,
            Self::DateOutOfRange { .. } => OraCode::DateOutOfRange,
            Self::UnknownTimeZone { .. } => OraCode::TimezoneRegionNotFound,
            Self::FunctionError(_) => OraCode::ValueError,
        }
    }

    /// Whether the caller can fix this by changing the argument values
    /// (as opposed to an environment problem like a missing zone region).
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::UnknownTimeZone { .. })
    }

    /// Create a null-argument error.
    pub const fn null_argument(function: &'static str) -> Self {
        Self::NullArgument { function }
    }

    /// Create a type-mismatch error.
    pub const fn type_mismatch(
        function: &'static str,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            function,
            expected,
            actual,
        }
    }

    /// Create a malformed-escape error at the given code-unit offset.
    pub fn malformed_escape(offset: usize, detail: impl Into<String>) -> Self {
        Self::MalformedEscape {
            offset,
            detail: detail.into(),
        }
    }

    /// Create an invalid-number error.
    pub fn invalid_number(detail: impl Into<String>) -> Self {
        Self::InvalidNumber {
            detail: detail.into(),
        }
    }

    /// Create a not-valid-day error.
    pub fn not_valid_day(name: impl Into<String>) -> Self {
        Self::NotValidDay { name: name.into() }
    }

    /// Create a date-out-of-range error.
    pub fn date_out_of_range(detail: impl Into<String>) -> Self {
        Self::DateOutOfRange {
            detail: detail.into(),
        }
    }

    /// Create an unknown-timezone error.
    pub fn unknown_time_zone(name: impl Into<String>) -> Self {
        Self::UnknownTimeZone { name: name.into() }
    }

    /// Create a generic function domain error.
    pub fn function_error(msg: impl Into<String>) -> Self {
        Self::FunctionError(msg.into())
    }
}

/// Result type alias using `OraError`.
pub type Result<T> = std::result::Result<T, OraError>;

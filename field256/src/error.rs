//! Error types.

use core::fmt;

/// Errors produced at the byte and randomness boundaries of the field
/// engine. Arithmetic itself is total and never fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The input byte slice does not have the field's fixed width.
    Length {
        /// Expected width in bytes.
        expected: usize,
        /// Width of the rejected input.
        actual: usize,
    },
    /// The decoded integer is not in the canonical range `[0, p)`.
    Range,
    /// The caller-supplied entropy source failed.
    RandomSample,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Length { expected, actual } => {
                write!(f, "invalid length: expected {expected} bytes, got {actual}")
            }
            Error::Range => write!(f, "value out of field range"),
            Error::RandomSample => write!(f, "entropy source failure"),
        }
    }
}

impl std::error::Error for Error {}

/// Result type for fallible field operations.
pub type Result<T> = core::result::Result<T, Error>;

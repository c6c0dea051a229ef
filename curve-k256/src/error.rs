//! Error types.

use core::fmt;

/// Errors produced at the boundaries of the curve layer: point decoding,
/// multi-scalar input validation, and hash-to-curve parameters. Group
/// arithmetic itself is total and never fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// An input byte slice does not have the required width.
    Length {
        /// Expected width in bytes.
        expected: usize,
        /// Width of the rejected input.
        actual: usize,
    },
    /// A decoded integer is not in the canonical range of its field.
    Range,
    /// A point encoding carries an unknown tag byte.
    Format,
    /// Decoded coordinates do not satisfy the curve equation, or the
    /// encoded x-coordinate has no square root on the curve.
    InvalidCoordinates,
    /// The caller-supplied entropy source failed.
    RandomSample,
    /// Multi-scalar multiplication inputs are empty or of unequal length.
    LengthMismatch,
    /// The hash-to-curve domain separation tag is empty.
    EmptyDst,
    /// The requested expand-message output exceeds the limits of RFC 9380.
    OversizeOutput,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Length { expected, actual } => {
                write!(f, "invalid length: expected {expected} bytes, got {actual}")
            }
            Error::Range => write!(f, "value out of field range"),
            Error::Format => write!(f, "unknown point encoding tag"),
            Error::InvalidCoordinates => write!(f, "coordinates not on curve"),
            Error::RandomSample => write!(f, "entropy source failure"),
            Error::LengthMismatch => {
                write!(f, "multi-scalar inputs empty or of unequal length")
            }
            Error::EmptyDst => write!(f, "empty domain separation tag"),
            Error::OversizeOutput => write!(f, "expand-message output too long"),
        }
    }
}

impl std::error::Error for Error {}

impl From<field256::Error> for Error {
    fn from(err: field256::Error) -> Self {
        match err {
            field256::Error::Length { expected, actual } => Error::Length { expected, actual },
            field256::Error::Range => Error::Range,
            field256::Error::RandomSample => Error::RandomSample,
        }
    }
}

/// Result type for fallible curve operations.
pub type Result<T> = core::result::Result<T, Error>;

//! secp256k1 group arithmetic.
//!
//! Built on the [`field256`] constant-time Montgomery engine, this crate
//! provides the curve's two fields as distinct types ([`FieldElement`],
//! [`Scalar`]), affine and projective points with complete addition
//! formulas, constant-time scalar multiplication, Pippenger multi-scalar
//! multiplication, the canonical SEC1-style point codecs, and the
//! RFC 9380 `secp256k1_XMD:SHA-256_SSWU_RO_` hash-to-curve suite.
//!
//! Curve parameters are reachable through the process-wide [`Curve`]
//! singleton, which is initialized lazily exactly once.

mod affine;
mod curve;
mod error;
mod field;
mod macros;
mod mul;
mod projective;
mod scalar;

pub mod hash2curve;

pub use crate::{
    affine::AffinePoint,
    curve::Curve,
    error::{Error, Result},
    field::FieldElement,
    projective::{CompressedPoint, ProjectivePoint},
    scalar::Scalar,
};

/// Canonical big-endian encoding of a field element or scalar.
pub type FieldBytes = [u8; 32];

/// Width of a compressed point encoding: sign byte plus x-coordinate.
pub const COMPRESSED_BYTES: usize = 33;

/// Width of an uncompressed point encoding: `0x04` plus both coordinates.
pub const UNCOMPRESSED_BYTES: usize = 65;

/// The curve name, as used in tagged serialization by higher layers.
pub const CURVE_NAME: &str = "secp256k1";

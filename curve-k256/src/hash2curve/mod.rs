//! Hashing byte strings to curve points and field elements (RFC 9380).

mod expand_msg;
mod osswu;

use sha2::Sha256;

use crate::error::Result;
use crate::field::FieldElement;
use crate::projective::ProjectivePoint;
use crate::scalar::Scalar;

pub use expand_msg::{ExpandMsg, ExpandMsgXmd, ExpandMsgXof};
pub use osswu::map_to_curve;

/// Domain separation tag of the ciphersuite implemented here.
pub const SUITE_DST: &[u8] = b"secp256k1_XMD:SHA-256_SSWU_RO_";

/// Bytes of expansion per field element: L = 48 gives 128-bit uniformity
/// margin over a 256-bit field.
const L: usize = 48;

/// Hashes `msg` to `count` uniform base-field elements.
pub fn hash_to_field<X: ExpandMsg>(
    msg: &[u8],
    dst: &[u8],
    count: usize,
) -> Result<Vec<FieldElement>> {
    let uniform = X::expand_message(msg, dst, count * L)?;
    Ok(uniform
        .chunks(L)
        .map(|chunk| {
            let mut wide = [0u8; 64];
            wide[64 - L..].copy_from_slice(chunk);
            FieldElement::from_bytes_wide(&wide)
        })
        .collect())
}

/// Hashes `msg` to `count` uniform scalars. Challenge derivation for
/// protocols layered on the group.
pub fn hash_to_scalars<X: ExpandMsg>(msg: &[u8], dst: &[u8], count: usize) -> Result<Vec<Scalar>> {
    let uniform = X::expand_message(msg, dst, count * L)?;
    Ok(uniform
        .chunks(L)
        .map(|chunk| {
            let mut wide = [0u8; 64];
            wide[64 - L..].copy_from_slice(chunk);
            Scalar::reduce_bytes_wide(&wide)
        })
        .collect())
}

/// The `secp256k1_XMD:SHA-256_SSWU_RO_` suite: hash to two field
/// elements, map each to the curve, and add. The cofactor is 1, so no
/// clearing step is needed.
pub fn hash_to_curve(msg: &[u8], dst: &[u8]) -> Result<ProjectivePoint> {
    let u = hash_to_field::<ExpandMsgXmd<Sha256>>(msg, dst, 2)?;
    let q0 = map_to_curve(&u[0]);
    let q1 = map_to_curve(&u[1]);
    Ok(ProjectivePoint::from(q0) + q1)
}

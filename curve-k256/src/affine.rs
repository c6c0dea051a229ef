//! Affine curve points and the canonical point codecs.

use core::fmt;

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use crate::error::{Error, Result};
use crate::field::FieldElement;
use crate::{COMPRESSED_BYTES, UNCOMPRESSED_BYTES};

/// The curve coefficient `b = 7` (`a` is zero).
pub(crate) const CURVE_B: FieldElement =
    FieldElement::from_monty([0x0000_0007_0000_1ab7, 0, 0, 0]);

/// A point on secp256k1 in affine coordinates.
///
/// The identity cannot be represented in affine coordinates; it is carried
/// by the `infinity` flag with `(0, 0)` as the conventional coordinates.
/// `(0, y)` is never on the curve since 7 is a non-residue, so the
/// convention is unambiguous.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) infinity: u8,
}

impl AffinePoint {
    /// The point at infinity.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ZERO,
        infinity: 1,
    };

    /// The base point `G` of SEC2.
    pub const GENERATOR: Self = Self {
        x: FieldElement::from_monty([
            0xd736_2e5a_487e_2097,
            0x231e_2953_29bc_66db,
            0x979f_48c0_33fd_129c,
            0x9981_e643_e908_9f48,
        ]),
        y: FieldElement::from_monty([
            0xb15e_a6d2_d3db_abe2,
            0x8dfc_5d5d_1f1d_c64d,
            0x70b6_b59a_ac19_c136,
            0xcf3f_851f_d4a5_82d6,
        ]),
        infinity: 0,
    };

    pub fn x(&self) -> FieldElement {
        self.x
    }

    pub fn y(&self) -> FieldElement {
        self.y
    }

    pub fn is_identity(&self) -> Choice {
        Choice::from(self.infinity)
    }

    /// `y^2 = x^3 + b`, or the identity.
    pub fn is_on_curve(&self) -> Choice {
        let lhs = self.y.square();
        let rhs = self.x.square() * self.x + CURVE_B;
        lhs.ct_eq(&rhs) | self.is_identity()
    }

    /// Builds a point from coordinates, validating the curve equation.
    pub fn from_xy(x: FieldElement, y: FieldElement) -> CtOption<Self> {
        let point = Self { x, y, infinity: 0 };
        let on_curve = y.square().ct_eq(&(x.square() * x + CURVE_B));
        CtOption::new(point, on_curve)
    }

    /// Recovers the point with the given x-coordinate and y parity. The
    /// flag is false when `x^3 + b` is a non-residue.
    pub fn derive_from_x(x: &FieldElement, y_is_odd: Choice) -> CtOption<Self> {
        let rhs = x.square() * x + CURVE_B;
        rhs.sqrt().map(|y| {
            let y = FieldElement::conditional_select(&y, &-y, y.is_odd() ^ y_is_odd);
            Self {
                x: *x,
                y,
                infinity: 0,
            }
        })
    }

    /// Encodes as 33 bytes: a parity tag (`0x02` even, `0x03` odd) and the
    /// big-endian x-coordinate. The identity encodes as `0x02 || 0^32`.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_BYTES] {
        let mut out = [0u8; COMPRESSED_BYTES];
        out[0] = 0x02 | u8::conditional_select(&0, &1, self.y.is_odd());
        out[1..].copy_from_slice(&self.x.to_bytes());
        out
    }

    /// Encodes as 65 bytes: `0x04` and both big-endian coordinates. The
    /// identity encodes as `0x04 || 0^64`.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_BYTES] {
        let mut out = [0u8; UNCOMPRESSED_BYTES];
        out[0] = 0x04;
        out[1..33].copy_from_slice(&self.x.to_bytes());
        out[33..].copy_from_slice(&self.y.to_bytes());
        out
    }

    /// Decodes a compressed encoding. `0x02 || 0^32` is the identity and
    /// bypasses the curve check; any other x with no matching point is
    /// rejected.
    pub fn from_compressed(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != COMPRESSED_BYTES {
            return Err(Error::Length {
                expected: COMPRESSED_BYTES,
                actual: bytes.len(),
            });
        }
        let tag = bytes[0];
        if tag != 0x02 && tag != 0x03 {
            return Err(Error::Format);
        }
        let x = FieldElement::from_slice(&bytes[1..])?;
        if bool::from(x.is_zero()) && tag == 0x02 {
            return Ok(Self::IDENTITY);
        }
        let y_is_odd = Choice::from(tag & 1);
        Option::<Self>::from(Self::derive_from_x(&x, y_is_odd)).ok_or(Error::InvalidCoordinates)
    }

    /// Decodes an uncompressed encoding, validating the curve equation.
    /// `0x04 || 0^64` is the identity.
    pub fn from_uncompressed(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != UNCOMPRESSED_BYTES {
            return Err(Error::Length {
                expected: UNCOMPRESSED_BYTES,
                actual: bytes.len(),
            });
        }
        if bytes[0] != 0x04 {
            return Err(Error::Format);
        }
        let x = FieldElement::from_slice(&bytes[1..33])?;
        let y = FieldElement::from_slice(&bytes[33..])?;
        if bool::from(x.is_zero() & y.is_zero()) {
            return Ok(Self::IDENTITY);
        }
        Option::<Self>::from(Self::from_xy(x, y)).ok_or(Error::InvalidCoordinates)
    }
}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            infinity: u8::conditional_select(&a.infinity, &b.infinity, choice),
        }
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        let both_infinity = self.is_identity() & other.is_identity();
        let neither = !self.is_identity() & !other.is_identity();
        both_infinity | (neither & self.x.ct_eq(&other.x) & self.y.ct_eq(&other.y))
    }
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for AffinePoint {}

impl Default for AffinePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl core::ops::Neg for AffinePoint {
    type Output = AffinePoint;

    fn neg(self) -> AffinePoint {
        AffinePoint {
            x: self.x,
            y: FieldElement::conditional_select(&-self.y, &FieldElement::ZERO, self.is_identity()),
            infinity: self.infinity,
        }
    }
}

impl fmt::Display for AffinePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity().into() {
            write!(f, "AffinePoint(identity)")
        } else {
            write!(f, "AffinePoint(x: {:?}, y: {:?})", self.x, self.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use subtle::Choice;

    use super::AffinePoint;
    use crate::error::Error;
    use crate::field::FieldElement;

    const G_X: [u8; 32] =
        hex!("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
    const G_Y: [u8; 32] =
        hex!("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8");

    #[test]
    fn generator_coordinates_match_sec2() {
        let g = AffinePoint::GENERATOR;
        assert_eq!(g.x().to_bytes(), G_X);
        assert_eq!(g.y().to_bytes(), G_Y);
        assert!(bool::from(g.is_on_curve()));
    }

    #[test]
    fn from_xy_validates() {
        let x = FieldElement::from_bytes(&G_X).unwrap();
        let y = FieldElement::from_bytes(&G_Y).unwrap();
        assert!(bool::from(AffinePoint::from_xy(x, y).is_some()));
        assert!(bool::from(AffinePoint::from_xy(x, y.double()).is_none()));
    }

    #[test]
    fn derive_from_x_respects_parity() {
        let x = FieldElement::from_bytes(&G_X).unwrap();
        let even = AffinePoint::derive_from_x(&x, Choice::from(0)).unwrap();
        let odd = AffinePoint::derive_from_x(&x, Choice::from(1)).unwrap();
        assert!(!bool::from(even.y().is_odd()));
        assert!(bool::from(odd.y().is_odd()));
        assert_eq!(even, -odd);
        // G_y is even.
        assert_eq!(even, AffinePoint::GENERATOR);
    }

    #[test]
    fn compressed_round_trip() {
        let g = AffinePoint::GENERATOR;
        let enc = g.to_compressed();
        assert_eq!(enc[0], 0x02);
        assert_eq!(AffinePoint::from_compressed(&enc).unwrap(), g);

        let neg = -g;
        let enc = neg.to_compressed();
        assert_eq!(enc[0], 0x03);
        assert_eq!(AffinePoint::from_compressed(&enc).unwrap(), neg);
    }

    #[test]
    fn uncompressed_round_trip() {
        let g = AffinePoint::GENERATOR;
        let enc = g.to_uncompressed();
        assert_eq!(enc[0], 0x04);
        assert_eq!(AffinePoint::from_uncompressed(&enc).unwrap(), g);
    }

    #[test]
    fn identity_encodings() {
        let id = AffinePoint::IDENTITY;
        let compressed = id.to_compressed();
        assert_eq!(compressed, {
            let mut expected = [0u8; 33];
            expected[0] = 0x02;
            expected
        });
        let decoded = AffinePoint::from_compressed(&compressed).unwrap();
        assert!(bool::from(decoded.is_identity()));

        let uncompressed = id.to_uncompressed();
        let decoded = AffinePoint::from_uncompressed(&uncompressed).unwrap();
        assert!(bool::from(decoded.is_identity()));
    }

    #[test]
    fn decode_rejects_bad_length() {
        assert_eq!(
            AffinePoint::from_compressed(&[0x02; 32]),
            Err(Error::Length {
                expected: 33,
                actual: 32
            })
        );
        assert_eq!(
            AffinePoint::from_uncompressed(&[0x04; 64]),
            Err(Error::Length {
                expected: 65,
                actual: 64
            })
        );
    }

    #[test]
    fn decode_rejects_bad_tag() {
        let mut enc = AffinePoint::GENERATOR.to_compressed();
        enc[0] = 0x05;
        assert_eq!(AffinePoint::from_compressed(&enc), Err(Error::Format));

        let mut enc = AffinePoint::GENERATOR.to_uncompressed();
        enc[0] = 0x02;
        assert_eq!(AffinePoint::from_uncompressed(&enc), Err(Error::Format));
    }

    #[test]
    fn decode_rejects_out_of_range_coordinate() {
        let mut enc = [0xff; 33];
        enc[0] = 0x02;
        assert_eq!(AffinePoint::from_compressed(&enc), Err(Error::Range));
    }

    #[test]
    fn decode_rejects_non_residue_x() {
        // x = 5: 5^3 + 7 = 132 is a non-residue mod p.
        let mut enc = [0u8; 33];
        enc[0] = 0x02;
        enc[32] = 0x05;
        assert_eq!(
            AffinePoint::from_compressed(&enc),
            Err(Error::InvalidCoordinates)
        );
    }

    #[test]
    fn decode_rejects_off_curve_uncompressed() {
        let g = AffinePoint::GENERATOR;
        let mut enc = [0u8; 65];
        enc[0] = 0x04;
        enc[1..33].copy_from_slice(&g.x().to_bytes());
        enc[33..].copy_from_slice(&g.x().to_bytes());
        assert_eq!(
            AffinePoint::from_uncompressed(&enc),
            Err(Error::InvalidCoordinates)
        );
    }

    #[test]
    fn odd_tag_with_zero_x_is_rejected() {
        // 7 is a non-residue, so no point has x = 0; only the 0x02 form
        // of the identity is accepted.
        let mut enc = [0u8; 33];
        enc[0] = 0x03;
        assert_eq!(
            AffinePoint::from_compressed(&enc),
            Err(Error::InvalidCoordinates)
        );
    }
}

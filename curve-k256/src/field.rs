//! The secp256k1 base field `GF(p)`, `p = 2^256 - 2^32 - 977`.

use core::fmt;

use ff::Field;
use field256::{FieldParams, MontyFieldElement};
use rand_core::RngCore;
use subtle::{Choice, ConstantTimeEq, CtOption};

use crate::error::Result;
use crate::macros::impl_field_newtype_ops;
use crate::FieldBytes;

/// Montgomery parameters for the base field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FpParams;

impl FieldParams for FpParams {
    const NAME: &'static str = "Fp";

    const MODULUS: [u64; 4] = [
        0xffff_fffe_ffff_fc2f,
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_ffff_ffff,
    ];

    const R: [u64; 4] = [0x0000_0001_0000_03d1, 0, 0, 0];

    const R2: [u64; 4] = [0x0000_07a2_000e_90a1, 0x0000_0000_0000_0001, 0, 0];

    const R3: [u64; 4] = [0x002b_b1e3_3795_f671, 0x0000_0001_0000_0b73, 0, 0];

    const INV: u64 = 0xd838_091d_d225_3531;

    const S: u32 = 1;

    // (p + 1) / 4
    const SQRT_EXP: [u64; 4] = [
        0xffff_ffff_bfff_ff0c,
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_ffff_ffff,
        0x3fff_ffff_ffff_ffff,
    ];

    const ROOT_OF_UNITY: [u64; 4] = [0, 0, 0, 0];
}

pub(crate) type Fp = MontyFieldElement<FpParams>;

/// An element of the secp256k1 base field.
#[derive(Clone, Copy, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct FieldElement(pub(crate) Fp);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self(Fp::ZERO);

    /// The multiplicative identity.
    pub const ONE: Self = Self(Fp::ONE);

    /// Wraps limbs already in Montgomery form. For precomputed constants.
    pub(crate) const fn from_monty(limbs: [u64; 4]) -> Self {
        Self(Fp::from_montgomery(limbs))
    }

    /// Converts a small integer.
    pub const fn from_u64(v: u64) -> Self {
        Self(Fp::from_u64(v))
    }

    /// Decodes a canonical big-endian encoding. Fails on values `>= p`.
    pub fn from_bytes(bytes: &FieldBytes) -> CtOption<Self> {
        Fp::from_bytes(bytes).map(Self)
    }

    /// Decodes a canonical big-endian encoding from a slice, checking the
    /// width up front.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self(Fp::from_slice(bytes)?))
    }

    /// Reduces a 64-byte big-endian integer modulo `p`.
    pub fn from_bytes_wide(bytes: &[u8; 64]) -> Self {
        Self(Fp::from_bytes_wide(bytes))
    }

    /// Returns the canonical big-endian encoding.
    pub fn to_bytes(&self) -> FieldBytes {
        self.0.to_bytes()
    }

    pub fn is_zero(&self) -> Choice {
        self.0.is_zero()
    }

    pub fn is_odd(&self) -> Choice {
        self.0.is_odd()
    }

    /// The RFC 9380 sign of a field element: parity of the canonical
    /// representative.
    pub fn sgn0(&self) -> Choice {
        self.0.is_odd()
    }

    pub fn double(&self) -> Self {
        Self(self.0.double())
    }

    pub fn square(&self) -> Self {
        Self(self.0.square())
    }

    /// Raises to a little-endian limb exponent in constant time.
    pub fn pow(&self, exp: &[u64; 4]) -> Self {
        Self(self.0.pow(exp))
    }

    /// Multiplicative inverse; the flag is false for zero.
    pub fn invert(&self) -> CtOption<Self> {
        self.0.invert().map(Self)
    }

    /// Square root via a single Shanks exponentiation (`p ≡ 3 mod 4`).
    pub fn sqrt(&self) -> CtOption<Self> {
        self.0.sqrt().map(Self)
    }

    /// Samples a uniform element by wide reduction of 64 RNG bytes;
    /// no rejection loop is needed.
    pub fn try_random(rng: &mut impl RngCore) -> Result<Self> {
        Ok(Self(Fp::try_random(rng)?))
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement(0x")?;
        for b in self.to_bytes() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

impl_field_newtype_ops!(FieldElement);

impl Field for FieldElement {
    const ZERO: Self = Self::ZERO;
    const ONE: Self = Self::ONE;

    fn random(mut rng: impl RngCore) -> Self {
        Self(Fp::random(&mut rng))
    }

    fn square(&self) -> Self {
        FieldElement::square(self)
    }

    fn double(&self) -> Self {
        FieldElement::double(self)
    }

    fn invert(&self) -> CtOption<Self> {
        FieldElement::invert(self)
    }

    fn sqrt(&self) -> CtOption<Self> {
        FieldElement::sqrt(self)
    }

    /// For `p ≡ 3 (mod 4)` the candidate `(num/div)^((p+1)/4)` already
    /// covers both contract cases: squaring it yields `num/div` exactly
    /// when that ratio is square, and `-num/div` otherwise, with `-1` the
    /// fixed non-residue.
    fn sqrt_ratio(num: &Self, div: &Self) -> (Choice, Self) {
        let x = *num * div.invert().unwrap_or(Self::ZERO);
        let cand = x.pow(&FpParams::SQRT_EXP);
        let is_square = cand.square().ct_eq(&x) & !div.is_zero();
        (is_square, cand)
    }
}

#[cfg(test)]
mod tests {
    use ff::Field;
    use hex_literal::hex;
    use subtle::ConstantTimeEq;

    use super::{FieldElement, Fp, FpParams};
    use field256::FieldParams;

    #[test]
    fn montgomery_constants_consistent() {
        assert_eq!(Fp::ONE.to_canonical(), [1, 0, 0, 0]);
        assert_eq!(FieldElement::from_monty(FpParams::R), FieldElement::ONE);
        assert_eq!(FieldElement::from_u64(1), FieldElement::ONE);
    }

    #[test]
    fn sgn0_matches_parity() {
        assert!(!bool::from(FieldElement::from_u64(4).is_odd()));
        assert!(bool::from(FieldElement::from_u64(7).is_odd()));
        // p - 1 is even.
        assert!(!bool::from((-FieldElement::ONE).is_odd()));
    }

    #[test]
    fn sqrt_ratio_square_case() {
        let num = FieldElement::from_u64(4);
        let div = FieldElement::from_u64(1);
        let (is_square, root) = FieldElement::sqrt_ratio(&num, &div);
        assert!(bool::from(is_square));
        assert_eq!(root.square(), num);
    }

    #[test]
    fn sqrt_ratio_non_square_case() {
        // 3 is a non-residue; the result must square to -3.
        let num = FieldElement::from_u64(3);
        let div = FieldElement::ONE;
        let (is_square, root) = FieldElement::sqrt_ratio(&num, &div);
        assert!(!bool::from(is_square));
        assert_eq!(root.square(), -num);
    }

    #[test]
    fn sqrt_ratio_zero_divisor() {
        let (is_square, root) =
            FieldElement::sqrt_ratio(&FieldElement::from_u64(4), &FieldElement::ZERO);
        assert!(!bool::from(is_square));
        assert!(bool::from(root.ct_eq(&FieldElement::ZERO)));
    }

    #[test]
    fn known_sqrt_vector() {
        let sqrt2 = FieldElement::from_u64(2).sqrt().unwrap();
        let expected = FieldElement::from_bytes(&hex!(
            "210c790573632359b1edb4302c117d8a132654692c3feeb7de3a86ac3f3b53f7"
        ))
        .unwrap();
        assert!(sqrt2 == expected || sqrt2 == -expected);
    }
}

//! The secp256k1 scalar field `GF(n)`, `n` the prime group order.

use core::fmt;

use ff::{Field, PrimeField};
use field256::{FieldParams, MontyFieldElement};
use num_bigint::BigUint;
use rand_core::RngCore;
use subtle::{Choice, CtOption};

use crate::error::Result;
use crate::macros::impl_field_newtype_ops;
use crate::FieldBytes;

/// Montgomery parameters for the scalar field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FqParams;

impl FieldParams for FqParams {
    const NAME: &'static str = "Fq";

    const MODULUS: [u64; 4] = [
        0xbfd2_5e8c_d036_4141,
        0xbaae_dce6_af48_a03b,
        0xffff_ffff_ffff_fffe,
        0xffff_ffff_ffff_ffff,
    ];

    const R: [u64; 4] = [
        0x402d_a173_2fc9_bebf,
        0x4551_2319_50b7_5fc4,
        0x0000_0000_0000_0001,
        0,
    ];

    const R2: [u64; 4] = [
        0x896c_f214_67d7_d140,
        0x7414_96c2_0e7c_f878,
        0xe697_f5e4_5bcd_07c6,
        0x9d67_1cd5_81c6_9bc5,
    ];

    const R3: [u64; 4] = [
        0x7bc0_cfe0_e9ff_41ed,
        0x0017_6484_44d4_322c,
        0xb1b3_1347_f1d0_b2da,
        0x555d_800c_18ef_116d,
    ];

    const INV: u64 = 0x4b0d_ff66_5588_b13f;

    const S: u32 = 6;

    // (t - 1) / 2 for the odd t = (n - 1) / 2^6.
    const SQRT_EXP: [u64; 4] = [
        0x777f_a4bd_19a0_6c82,
        0xfd75_5db9_cd5e_9140,
        0xffff_ffff_ffff_ffff,
        0x01ff_ffff_ffff_ffff,
    ];

    // 7^t in Montgomery form.
    const ROOT_OF_UNITY: [u64; 4] = [
        0x944c_f2a2_2091_0e04,
        0x815c_829c_7805_89f4,
        0x5598_0b07_bc22_2113,
        0xc702_b0d2_4882_5b36,
    ];
}

pub(crate) type Fq = MontyFieldElement<FqParams>;

/// An integer modulo the secp256k1 group order.
#[derive(Clone, Copy, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct Scalar(pub(crate) Fq);

impl Scalar {
    /// The additive identity.
    pub const ZERO: Self = Self(Fq::ZERO);

    /// The multiplicative identity.
    pub const ONE: Self = Self(Fq::ONE);

    /// Converts a small integer.
    pub const fn from_u64(v: u64) -> Self {
        Self(Fq::from_u64(v))
    }

    /// Decodes a canonical big-endian encoding. Fails on values `>= n`.
    pub fn from_bytes(bytes: &FieldBytes) -> CtOption<Self> {
        Fq::from_bytes(bytes).map(Self)
    }

    /// Decodes a canonical big-endian encoding from a slice, checking the
    /// width up front.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self(Fq::from_slice(bytes)?))
    }

    /// Reduces a 64-byte big-endian integer modulo `n`. The image of a
    /// uniform input is statistically close to uniform.
    pub fn reduce_bytes_wide(bytes: &[u8; 64]) -> Self {
        Self(Fq::from_bytes_wide(bytes))
    }

    /// Returns the canonical big-endian encoding.
    pub fn to_bytes(&self) -> FieldBytes {
        self.0.to_bytes()
    }

    /// Canonical little-endian bytes, as consumed by the window recodings.
    pub(crate) fn to_le_bytes(&self) -> FieldBytes {
        let mut bytes = self.0.to_bytes();
        bytes.reverse();
        bytes
    }

    pub fn is_zero(&self) -> Choice {
        self.0.is_zero()
    }

    pub fn is_odd(&self) -> Choice {
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

    /// Square root via constant-time Tonelli-Shanks.
    pub fn sqrt(&self) -> CtOption<Self> {
        self.0.sqrt().map(Self)
    }

    /// Samples a uniform scalar by wide reduction of 64 RNG bytes;
    /// no rejection loop is needed.
    pub fn try_random(rng: &mut impl RngCore) -> Result<Self> {
        Ok(Self(Fq::try_random(rng)?))
    }

    /// The canonical value as an arbitrary-precision integer. Variable
    /// time; for interop with protocol layers, not for secrets.
    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.to_bytes())
    }

    /// Converts an arbitrary-precision integer, reducing it modulo `n`.
    /// Variable time; for interop with protocol layers, not for secrets.
    pub fn from_biguint(v: &BigUint) -> Self {
        let bytes = (v % Self::order_biguint()).to_bytes_be();
        let mut wide = [0u8; 64];
        wide[64 - bytes.len()..].copy_from_slice(&bytes);
        Self::reduce_bytes_wide(&wide)
    }

    fn order_biguint() -> BigUint {
        let mut bytes = [0u8; 32];
        for (chunk, limb) in bytes.chunks_exact_mut(8).zip(FqParams::MODULUS.iter().rev()) {
            chunk.copy_from_slice(&limb.to_be_bytes());
        }
        BigUint::from_bytes_be(&bytes)
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar(0x")?;
        for b in self.to_bytes() {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Self::from_u64(v)
    }
}

impl_field_newtype_ops!(Scalar);

impl Field for Scalar {
    const ZERO: Self = Self::ZERO;
    const ONE: Self = Self::ONE;

    fn random(mut rng: impl RngCore) -> Self {
        Self(Fq::random(&mut rng))
    }

    fn square(&self) -> Self {
        Scalar::square(self)
    }

    fn double(&self) -> Self {
        Scalar::double(self)
    }

    fn invert(&self) -> CtOption<Self> {
        Scalar::invert(self)
    }

    fn sqrt(&self) -> CtOption<Self> {
        Scalar::sqrt(self)
    }

    fn sqrt_ratio(num: &Self, div: &Self) -> (Choice, Self) {
        ff::helpers::sqrt_ratio_generic(num, div)
    }
}

impl PrimeField for Scalar {
    type Repr = FieldBytes;

    const MODULUS: &'static str =
        "0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";
    const NUM_BITS: u32 = 256;
    const CAPACITY: u32 = 255;
    const TWO_INV: Self = Self(Fq::from_montgomery([0, 0, 0, 0x8000_0000_0000_0000]));
    const MULTIPLICATIVE_GENERATOR: Self = Self(Fq::from_montgomery([
        0xc13f_6a26_4e84_3739,
        0xe537_f5b1_3503_9e5d,
        0x0000_0000_0000_0008,
        0,
    ]));
    const S: u32 = 6;
    const ROOT_OF_UNITY: Self = Self(Fq::from_montgomery(FqParams::ROOT_OF_UNITY));
    const ROOT_OF_UNITY_INV: Self = Self(Fq::from_montgomery([
        0xb2dc_d52a_af4d_d71f,
        0x428e_55dc_1672_be1d,
        0xe44b_48d2_d795_a1b6,
        0xc14e_c331_4e10_97c2,
    ]));
    const DELTA: Self = Self(Fq::from_montgomery([
        0xd91b_33d2_4319_d9e8,
        0xb81c_6596_ff5d_6740,
        0xa463_969c_a14c_51c1,
        0x1900_960d_e4b7_929c,
    ]));

    fn from_repr(repr: Self::Repr) -> CtOption<Self> {
        Self::from_bytes(&repr)
    }

    fn to_repr(&self) -> Self::Repr {
        self.to_bytes()
    }

    fn is_odd(&self) -> Choice {
        Scalar::is_odd(self)
    }
}

#[cfg(test)]
mod tests {
    use ff::{Field, PrimeField};
    use num_bigint::BigUint;
    use num_traits::Num;
    use proptest::prelude::*;
    use subtle::ConstantTimeEq;

    use super::Scalar;

    fn order() -> BigUint {
        BigUint::from_str_radix(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
            16,
        )
        .unwrap()
    }

    #[test]
    fn two_inv_is_inverse_of_two() {
        assert_eq!(Scalar::TWO_INV * Scalar::from_u64(2), Scalar::ONE);
    }

    #[test]
    fn root_of_unity_has_order_2_to_s() {
        let mut x = Scalar::ROOT_OF_UNITY;
        for _ in 0..Scalar::S {
            assert_ne!(x, Scalar::ONE);
            x = x.square();
        }
        assert_eq!(x, Scalar::ONE);
        assert_eq!(
            Scalar::ROOT_OF_UNITY * Scalar::ROOT_OF_UNITY_INV,
            Scalar::ONE
        );
    }

    #[test]
    fn generator_and_delta_consistent() {
        // g^(2^S * t) = 1 and delta = g^(2^S) by definition.
        let t_exp = [
            0xeeff_497a_3340_d905,
            0xfaea_bb73_9abd_2280,
            0xffff_ffff_ffff_ffff,
            0x03ff_ffff_ffff_ffff,
        ];
        assert_eq!(
            Scalar::MULTIPLICATIVE_GENERATOR.pow(&t_exp),
            Scalar::ROOT_OF_UNITY
        );
        let mut delta = Scalar::MULTIPLICATIVE_GENERATOR;
        for _ in 0..Scalar::S {
            delta = delta.square();
        }
        assert_eq!(delta, Scalar::DELTA);
    }

    #[test]
    fn repr_round_trip() {
        let x = Scalar::from_u64(0xdead_beef);
        assert_eq!(Scalar::from_repr(x.to_repr()).unwrap(), x);
    }

    #[test]
    fn rejects_order_and_above() {
        let mut bytes = [0u8; 32];
        let order = order().to_bytes_be();
        bytes.copy_from_slice(&order);
        assert!(bool::from(Scalar::from_bytes(&bytes).is_none()));
    }

    #[test]
    fn biguint_round_trip() {
        let x = Scalar::from_u64(123_456_789);
        assert_eq!(Scalar::from_biguint(&x.to_biguint()), x);
    }

    #[test]
    fn from_biguint_reduces_mod_n() {
        assert_eq!(Scalar::from_biguint(&order()), Scalar::ZERO);
        assert_eq!(
            Scalar::from_biguint(&(order() + BigUint::from(5u32))),
            Scalar::from_u64(5)
        );
        assert_eq!(
            Scalar::from_biguint(&(order() * BigUint::from(3u32))),
            Scalar::ZERO
        );
    }

    #[test]
    fn sqrt_ratio_generic_agrees_with_sqrt() {
        let num = Scalar::from_u64(9);
        let (is_square, root) = Scalar::sqrt_ratio(&num, &Scalar::ONE);
        assert!(bool::from(is_square));
        assert_eq!(root.square(), num);
    }

    proptest! {
        #[test]
        fn mul_matches_biguint(a in any::<u64>(), b in any::<u64>()) {
            let lhs = Scalar::from_u64(a) * Scalar::from_u64(b);
            let rhs = (BigUint::from(a) * BigUint::from(b)) % order();
            prop_assert_eq!(lhs.to_biguint(), rhs);
        }

        #[test]
        fn invert_round_trip(a in 1u64..) {
            let x = Scalar::from_u64(a);
            let inv = x.invert().unwrap();
            prop_assert!(bool::from((x * inv).ct_eq(&Scalar::ONE)));
        }
    }
}

//! Modular square roots, adapted from <https://eprint.iacr.org/2012/685.pdf>.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use crate::element::MontyFieldElement;
use crate::params::FieldParams;

impl<P: FieldParams> MontyFieldElement<P> {
    /// Returns a square root of `self`, or a false flag if `self` is a
    /// non-residue. Which of the two roots is returned is unspecified.
    ///
    /// The algorithm is chosen by the 2-adicity of `p - 1`: a single Shanks
    /// exponentiation when `p ≡ 3 (mod 4)`, constant-time Tonelli-Shanks
    /// otherwise. Control flow never depends on the value.
    pub fn sqrt(&self) -> CtOption<Self> {
        if P::S == 1 {
            self.sqrt_shanks()
        } else {
            self.sqrt_tonelli_shanks()
        }
    }

    /// Shanks algorithm for `p ≡ 3 (mod 4)`: `self^((p + 1) / 4)`, verified
    /// by squaring.
    fn sqrt_shanks(&self) -> CtOption<Self> {
        debug_assert_eq!(P::S, 1);
        let sqrt = self.pow(&P::SQRT_EXP);
        CtOption::new(sqrt, sqrt.square().ct_eq(self))
    }

    /// Tonelli-Shanks for any odd prime, with `P::SQRT_EXP = (t - 1) / 2`
    /// and `P::ROOT_OF_UNITY = g^t` for `t = (p - 1) / 2^S` odd.
    fn sqrt_tonelli_shanks(&self) -> CtOption<Self> {
        let w = self.pow(&P::SQRT_EXP);

        let mut v = P::S;
        let mut x = *self * w;
        let mut b = x * w;
        let mut z = Self::from_montgomery(P::ROOT_OF_UNITY);

        for max_v in (1..=P::S).rev() {
            let mut k = 1;
            let mut tmp = b.square();
            let mut j_less_than_v = Choice::from(1);

            for j in 2..max_v {
                let tmp_is_one = tmp.ct_eq(&Self::ONE);
                let squared = Self::conditional_select(&tmp, &z, tmp_is_one).square();
                tmp = Self::conditional_select(&squared, &tmp, tmp_is_one);
                let new_z = Self::conditional_select(&z, &squared, tmp_is_one);
                j_less_than_v &= !j.ct_eq(&v);
                k = u32::conditional_select(&j, &k, tmp_is_one);
                z = Self::conditional_select(&z, &new_z, j_less_than_v);
            }

            let result = x * z;
            x = Self::conditional_select(&result, &x, b.ct_eq(&Self::ONE));
            z = z.square();
            b *= z;
            v = k;
        }

        CtOption::new(x, x.square().ct_eq(self))
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use proptest::prelude::*;

    use crate::test_fields::{Secp256k1Base, Secp256k1Order};
    use crate::MontyFieldElement;

    type Fp = MontyFieldElement<Secp256k1Base>;
    type Fq = MontyFieldElement<Secp256k1Order>;

    #[test]
    fn shanks_small_squares() {
        for n in [1u64, 4, 9, 16, 25, 36, 49, 64] {
            let fe = Fp::from_u64(n);
            let sqrt = fe.sqrt().unwrap();
            assert_eq!(sqrt.square(), fe);
        }
    }

    #[test]
    fn shanks_known_vector() {
        let sqrt2 = Fp::from_u64(2).sqrt().unwrap();
        let expected = Fp::from_bytes(&hex!(
            "210c790573632359b1edb4302c117d8a132654692c3feeb7de3a86ac3f3b53f7"
        ))
        .unwrap();
        assert!(sqrt2 == expected || sqrt2 == -expected);
    }

    #[test]
    fn shanks_rejects_non_residue() {
        // 3 is a non-residue mod the secp256k1 base prime.
        assert!(bool::from(Fp::from_u64(3).sqrt().is_none()));
    }

    #[test]
    fn tonelli_shanks_small_squares() {
        for n in [1u64, 4, 9, 16, 25, 36, 49, 64] {
            let fe = Fq::from_u64(n);
            let sqrt = fe.sqrt().unwrap();
            assert_eq!(sqrt.square(), fe);
        }
    }

    #[test]
    fn tonelli_shanks_rejects_non_residue() {
        // 5 is a non-residue mod the secp256k1 group order.
        assert!(bool::from(Fq::from_u64(5).sqrt().is_none()));
    }

    #[test]
    fn sqrt_of_zero() {
        assert_eq!(Fp::ZERO.sqrt().unwrap(), Fp::ZERO);
        assert_eq!(Fq::ZERO.sqrt().unwrap(), Fq::ZERO);
    }

    proptest! {
        #[test]
        fn square_always_has_root(w in any::<(u64, u64, u64, u64)>()) {
            let mut buf = [0u8; 64];
            buf[0..8].copy_from_slice(&w.0.to_be_bytes());
            buf[8..16].copy_from_slice(&w.1.to_be_bytes());
            buf[16..24].copy_from_slice(&w.2.to_be_bytes());
            buf[24..32].copy_from_slice(&w.3.to_be_bytes());

            let x = Fp::from_bytes_wide(&buf);
            let sq = x.square();
            let root = sq.sqrt().unwrap();
            prop_assert!(root == x || root == -x);

            let y = Fq::from_bytes_wide(&buf);
            let sq = y.square();
            let root = sq.sqrt().unwrap();
            prop_assert!(root == y || root == -y);
        }
    }
}

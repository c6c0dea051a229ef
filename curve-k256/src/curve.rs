//! The process-wide secp256k1 parameter singleton.

use num_bigint::BigUint;
use once_cell::sync::Lazy;
use rand_core::RngCore;

use field256::FieldParams;

use crate::affine::AffinePoint;
use crate::error::Result;
use crate::field::{FieldElement, FpParams};
use crate::hash2curve;
use crate::projective::ProjectivePoint;
use crate::scalar::{FqParams, Scalar};
use crate::CURVE_NAME;

static CURVE: Lazy<Curve> = Lazy::new(|| Curve {
    name: CURVE_NAME,
    base_field_modulus: biguint_from_limbs(&FpParams::MODULUS),
    scalar_field_modulus: biguint_from_limbs(&FqParams::MODULUS),
    a: FieldElement::ZERO,
    b: crate::affine::CURVE_B,
    generator: AffinePoint::GENERATOR,
    cofactor: 1,
});

fn biguint_from_limbs(limbs: &[u64; 4]) -> BigUint {
    let mut bytes = [0u8; 32];
    for (chunk, limb) in bytes.chunks_exact_mut(8).zip(limbs.iter().rev()) {
        chunk.copy_from_slice(&limb.to_be_bytes());
    }
    BigUint::from_bytes_be(&bytes)
}

/// Curve-level parameters and operations. One immutable instance exists
/// per process, initialized on first use.
pub struct Curve {
    name: &'static str,
    base_field_modulus: BigUint,
    scalar_field_modulus: BigUint,
    a: FieldElement,
    b: FieldElement,
    generator: AffinePoint,
    cofactor: u64,
}

impl Curve {
    /// The singleton instance.
    pub fn get() -> &'static Curve {
        &CURVE
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The base field prime `p` as an arbitrary-precision integer.
    pub fn base_field_modulus(&self) -> &BigUint {
        &self.base_field_modulus
    }

    /// The group order `n` as an arbitrary-precision integer.
    pub fn scalar_field_modulus(&self) -> &BigUint {
        &self.scalar_field_modulus
    }

    /// Alias for [`Curve::scalar_field_modulus`]; the cofactor is 1.
    pub fn order(&self) -> &BigUint {
        &self.scalar_field_modulus
    }

    /// The coefficient `a = 0` of the short Weierstrass equation.
    pub fn a(&self) -> FieldElement {
        self.a
    }

    /// The coefficient `b = 7`.
    pub fn b(&self) -> FieldElement {
        self.b
    }

    pub fn generator(&self) -> AffinePoint {
        self.generator
    }

    pub fn cofactor(&self) -> u64 {
        self.cofactor
    }

    /// See [`ProjectivePoint::multiscalar_mul`].
    pub fn multiscalar_mul(
        &self,
        scalars: &[Scalar],
        points: &[ProjectivePoint],
    ) -> Result<ProjectivePoint> {
        ProjectivePoint::multiscalar_mul(scalars, points)
    }

    /// Hashes a message to a point with the curve's own suite DST.
    pub fn hash_to_curve(&self, msg: &[u8]) -> Result<ProjectivePoint> {
        hash2curve::hash_to_curve(msg, hash2curve::SUITE_DST)
    }

    /// A uniform point with unknown discrete log: 64 RNG bytes pushed
    /// through the hash-to-curve suite.
    pub fn random_point(&self, rng: &mut impl RngCore) -> Result<ProjectivePoint> {
        let mut buf = [0u8; 64];
        rng.fill_bytes(&mut buf);
        hash2curve::hash_to_curve(&buf, hash2curve::SUITE_DST)
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use num_traits::Num;
    use rand_core::OsRng;

    use super::Curve;
    use crate::affine::AffinePoint;
    use crate::field::FieldElement;
    use crate::projective::ProjectivePoint;
    use crate::scalar::Scalar;

    #[test]
    fn singleton_is_shared() {
        let a = Curve::get() as *const Curve;
        let b = Curve::get() as *const Curve;
        assert_eq!(a, b);
    }

    #[test]
    fn parameters() {
        let curve = Curve::get();
        assert_eq!(curve.name(), "secp256k1");
        assert_eq!(curve.cofactor(), 1);
        assert_eq!(curve.a(), FieldElement::ZERO);
        assert_eq!(curve.b(), FieldElement::from_u64(7));
        assert_eq!(curve.generator(), AffinePoint::GENERATOR);

        let p = BigUint::from_str_radix(
            "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f",
            16,
        )
        .unwrap();
        let n = BigUint::from_str_radix(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
            16,
        )
        .unwrap();
        assert_eq!(curve.base_field_modulus(), &p);
        assert_eq!(curve.scalar_field_modulus(), &n);
        assert_eq!(curve.order(), &n);
    }

    #[test]
    fn delegated_operations() {
        let curve = Curve::get();
        let g = ProjectivePoint::GENERATOR;

        let sum = curve
            .multiscalar_mul(&[Scalar::from_u64(2), Scalar::from_u64(3)], &[g, g])
            .unwrap();
        assert_eq!(sum, g.mul(&Scalar::from_u64(5)));

        let hashed = curve.hash_to_curve(b"test message").unwrap();
        assert!(bool::from(hashed.is_on_curve()));

        let random = curve.random_point(&mut OsRng).unwrap();
        assert!(bool::from(random.is_on_curve()));
    }
}

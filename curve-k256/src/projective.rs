//! Projective curve points with complete addition formulas.
//!
//! The group law is the a = 0 specialization of Renes-Costello-Batina
//! (<https://eprint.iacr.org/2015/1060>, Algorithms 7-9). The formulas are
//! complete: they are correct for every pair of inputs, including doubling
//! an operand and adding the identity, so no code path depends on the
//! operands.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use field256::FieldParams;
use group::{Group, GroupEncoding};
use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

use crate::affine::AffinePoint;
use crate::field::FieldElement;
use crate::hash2curve;
use crate::scalar::{FqParams, Scalar};

/// `3 * b = 21` in Montgomery form, the constant the complete formulas
/// consume.
const CURVE_B3: FieldElement = FieldElement::from_monty([0x0000_0015_0000_5025, 0, 0, 0]);

/// The 33-byte compressed encoding, wrapped so it satisfies the
/// `GroupEncoding` representation bounds (`[u8; 33]` has no `Default`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompressedPoint(pub [u8; crate::COMPRESSED_BYTES]);

impl Default for CompressedPoint {
    fn default() -> Self {
        Self([0u8; crate::COMPRESSED_BYTES])
    }
}

impl AsRef<[u8]> for CompressedPoint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsMut<[u8]> for CompressedPoint {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

/// A point on secp256k1 in homogeneous projective coordinates.
#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
    pub(crate) x: FieldElement,
    pub(crate) y: FieldElement,
    pub(crate) z: FieldElement,
}

impl ProjectivePoint {
    /// The point at infinity, `(0 : 1 : 0)`.
    pub const IDENTITY: Self = Self {
        x: FieldElement::ZERO,
        y: FieldElement::ONE,
        z: FieldElement::ZERO,
    };

    /// The base point `G`.
    pub const GENERATOR: Self = Self {
        x: AffinePoint::GENERATOR.x,
        y: AffinePoint::GENERATOR.y,
        z: FieldElement::ONE,
    };

    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    /// `y^2 z = x^3 + b z^3` in constant time. The identity satisfies the
    /// equation trivially.
    pub fn is_on_curve(&self) -> Choice {
        let lhs = self.y.square() * self.z;
        let z2 = self.z.square();
        let rhs = self.x.square() * self.x + crate::affine::CURVE_B * z2 * self.z;
        lhs.ct_eq(&rhs)
    }

    /// Whether `[n]P` is the identity for the group order `n`. The order
    /// is baked in rather than passed by the caller; secp256k1 has a
    /// single subgroup of interest. The cofactor is 1, so this holds for
    /// every on-curve point; the check is a vartime double-and-add over
    /// the public order.
    pub fn is_torsion_element(&self) -> Choice {
        let mut acc = Self::IDENTITY;
        for limb in FqParams::MODULUS.iter().rev() {
            for byte in limb.to_be_bytes() {
                for bit in (0..8).rev() {
                    acc = acc.double();
                    if (byte >> bit) & 1 == 1 {
                        acc += self;
                    }
                }
            }
        }
        acc.is_identity()
    }

    /// Complete point addition (RCB Algorithm 7).
    pub fn add(&self, rhs: &Self) -> Self {
        let (x1, y1, z1) = (self.x, self.y, self.z);
        let (x2, y2, z2) = (rhs.x, rhs.y, rhs.z);

        let t0 = x1 * x2;
        let t1 = y1 * y2;
        let t2 = z1 * z2;
        let t3 = (x1 + y1) * (x2 + y2) - (t0 + t1);
        let xz_pairs = (x1 + z1) * (x2 + z2) - (t0 + t2);
        let yz_pairs = (y1 + z1) * (y2 + z2) - (t1 + t2);

        let bzz3 = CURVE_B3 * t2;
        let xx3 = t0.double() + t0;
        let bxz3 = CURVE_B3 * xz_pairs;

        let x3 = t3 * (t1 - bzz3) - yz_pairs * bxz3;
        let y3 = (t1 - bzz3) * (t1 + bzz3) + xx3 * bxz3;
        let z3 = yz_pairs * (t1 + bzz3) + t3 * xx3;

        Self {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Complete mixed addition (RCB Algorithm 8). A separate routine
    /// because the affine representation cannot carry the identity; the
    /// result is patched when `rhs` is the identity.
    pub fn add_mixed(&self, rhs: &AffinePoint) -> Self {
        let (x1, y1, z1) = (self.x, self.y, self.z);
        let (x2, y2) = (rhs.x, rhs.y);

        let t0 = x1 * x2;
        let t1 = y1 * y2;
        let t3 = (x1 + y1) * (x2 + y2) - (t0 + t1);
        let xz_pairs = x2 * z1 + x1;
        let yz_pairs = y2 * z1 + y1;

        let bzz3 = CURVE_B3 * z1;
        let xx3 = t0.double() + t0;
        let bxz3 = CURVE_B3 * xz_pairs;

        let x3 = t3 * (t1 - bzz3) - yz_pairs * bxz3;
        let y3 = (t1 - bzz3) * (t1 + bzz3) + xx3 * bxz3;
        let z3 = yz_pairs * (t1 + bzz3) + t3 * xx3;

        let mut ret = Self {
            x: x3,
            y: y3,
            z: z3,
        };
        ret.conditional_assign(self, rhs.is_identity());
        ret
    }

    /// Complete doubling (RCB Algorithm 9).
    pub fn double(&self) -> Self {
        let (x, y, z) = (self.x, self.y, self.z);

        let yy = y.square();
        let yy8 = yy.double().double().double();
        let yz = y * z;
        let bzz3 = CURVE_B3 * z.square();

        let t = yy - (bzz3.double() + bzz3);
        let x3 = (x * y) * t;

        Self {
            x: x3.double(),
            y: t * (yy + bzz3) + bzz3 * yy8,
            z: yz * yy8,
        }
    }

    pub fn neg(&self) -> Self {
        Self {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        self.add(&rhs.neg())
    }

    pub fn sub_mixed(&self, rhs: &AffinePoint) -> Self {
        self.add_mixed(&-*rhs)
    }

    /// Converts to affine with a single inversion. The identity maps to
    /// the affine identity convention `(0, 0)`.
    pub fn to_affine(&self) -> AffinePoint {
        self.z
            .invert()
            .map(|zinv| AffinePoint {
                x: self.x * zinv,
                y: self.y * zinv,
                infinity: 0,
            })
            .unwrap_or(AffinePoint::IDENTITY)
    }
}

impl From<AffinePoint> for ProjectivePoint {
    fn from(p: AffinePoint) -> Self {
        Self {
            x: p.x,
            y: FieldElement::conditional_select(&p.y, &FieldElement::ONE, p.is_identity()),
            z: FieldElement::conditional_select(
                &FieldElement::ONE,
                &FieldElement::ZERO,
                p.is_identity(),
            ),
        }
    }
}

impl From<&AffinePoint> for ProjectivePoint {
    fn from(p: &AffinePoint) -> Self {
        Self::from(*p)
    }
}

impl From<ProjectivePoint> for AffinePoint {
    fn from(p: ProjectivePoint) -> Self {
        p.to_affine()
    }
}

impl From<&ProjectivePoint> for AffinePoint {
    fn from(p: &ProjectivePoint) -> Self {
        p.to_affine()
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl ConstantTimeEq for ProjectivePoint {
    /// Cross-multiplication equality: `(x1 : y1 : z1) == (x2 : y2 : z2)`
    /// iff `x1 z2 = x2 z1` and `y1 z2 = y2 z1`.
    fn ct_eq(&self, other: &Self) -> Choice {
        let x_eq = (self.x * other.z).ct_eq(&(other.x * self.z));
        let y_eq = (self.y * other.z).ct_eq(&(other.y * self.z));
        x_eq & y_eq
    }
}

impl PartialEq for ProjectivePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for ProjectivePoint {}

impl Default for ProjectivePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Add for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, rhs: ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::add(&self, &rhs)
    }
}

impl Add<&ProjectivePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, rhs: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::add(&self, rhs)
    }
}

impl Add<&ProjectivePoint> for &ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, rhs: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::add(self, rhs)
    }
}

impl Add<AffinePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, rhs: AffinePoint) -> ProjectivePoint {
        self.add_mixed(&rhs)
    }
}

impl Add<&AffinePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn add(self, rhs: &AffinePoint) -> ProjectivePoint {
        self.add_mixed(rhs)
    }
}

impl AddAssign for ProjectivePoint {
    fn add_assign(&mut self, rhs: ProjectivePoint) {
        *self = ProjectivePoint::add(self, &rhs);
    }
}

impl AddAssign<&ProjectivePoint> for ProjectivePoint {
    fn add_assign(&mut self, rhs: &ProjectivePoint) {
        *self = ProjectivePoint::add(self, rhs);
    }
}

impl AddAssign<AffinePoint> for ProjectivePoint {
    fn add_assign(&mut self, rhs: AffinePoint) {
        *self = self.add_mixed(&rhs);
    }
}

impl AddAssign<&AffinePoint> for ProjectivePoint {
    fn add_assign(&mut self, rhs: &AffinePoint) {
        *self = self.add_mixed(rhs);
    }
}

impl Sub for ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, rhs: ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::sub(&self, &rhs)
    }
}

impl Sub<&ProjectivePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, rhs: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::sub(&self, rhs)
    }
}

impl Sub<&ProjectivePoint> for &ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, rhs: &ProjectivePoint) -> ProjectivePoint {
        ProjectivePoint::sub(self, rhs)
    }
}

impl Sub<AffinePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, rhs: AffinePoint) -> ProjectivePoint {
        self.sub_mixed(&rhs)
    }
}

impl Sub<&AffinePoint> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn sub(self, rhs: &AffinePoint) -> ProjectivePoint {
        self.sub_mixed(rhs)
    }
}

impl SubAssign for ProjectivePoint {
    fn sub_assign(&mut self, rhs: ProjectivePoint) {
        *self = ProjectivePoint::sub(self, &rhs);
    }
}

impl SubAssign<&ProjectivePoint> for ProjectivePoint {
    fn sub_assign(&mut self, rhs: &ProjectivePoint) {
        *self = ProjectivePoint::sub(self, rhs);
    }
}

impl SubAssign<AffinePoint> for ProjectivePoint {
    fn sub_assign(&mut self, rhs: AffinePoint) {
        *self = self.sub_mixed(&rhs);
    }
}

impl SubAssign<&AffinePoint> for ProjectivePoint {
    fn sub_assign(&mut self, rhs: &AffinePoint) {
        *self = self.sub_mixed(rhs);
    }
}

impl Neg for ProjectivePoint {
    type Output = ProjectivePoint;

    fn neg(self) -> ProjectivePoint {
        ProjectivePoint::neg(&self)
    }
}

impl Neg for &ProjectivePoint {
    type Output = ProjectivePoint;

    fn neg(self) -> ProjectivePoint {
        ProjectivePoint::neg(self)
    }
}

impl Sum for ProjectivePoint {
    fn sum<I: Iterator<Item = ProjectivePoint>>(iter: I) -> ProjectivePoint {
        iter.fold(ProjectivePoint::IDENTITY, |acc, p| acc + p)
    }
}

impl<'a> Sum<&'a ProjectivePoint> for ProjectivePoint {
    fn sum<I: Iterator<Item = &'a ProjectivePoint>>(iter: I) -> ProjectivePoint {
        iter.fold(ProjectivePoint::IDENTITY, |acc, p| acc + p)
    }
}

impl Group for ProjectivePoint {
    type Scalar = Scalar;

    /// Hashes 64 bytes of RNG output onto the curve, so the output is a
    /// uniform group element with unknown discrete log.
    fn random(mut rng: impl RngCore) -> Self {
        let mut buf = [0u8; 64];
        rng.fill_bytes(&mut buf);
        // The fixed suite DST satisfies the expand-message parameter
        // checks, so the fallback is unreachable.
        hash2curve::hash_to_curve(&buf, hash2curve::SUITE_DST).unwrap_or(Self::GENERATOR)
    }

    fn identity() -> Self {
        Self::IDENTITY
    }

    fn generator() -> Self {
        Self::GENERATOR
    }

    fn is_identity(&self) -> Choice {
        ProjectivePoint::is_identity(self)
    }

    fn double(&self) -> Self {
        ProjectivePoint::double(self)
    }
}

impl group::Curve for ProjectivePoint {
    type AffineRepr = AffinePoint;

    fn to_affine(&self) -> AffinePoint {
        ProjectivePoint::to_affine(self)
    }
}

impl GroupEncoding for ProjectivePoint {
    type Repr = CompressedPoint;

    fn from_bytes(bytes: &Self::Repr) -> CtOption<Self> {
        let decoded = AffinePoint::from_compressed(&bytes.0).ok();
        let is_some = Choice::from(u8::from(decoded.is_some()));
        let point = decoded.map(Self::from).unwrap_or(Self::IDENTITY);
        CtOption::new(point, is_some)
    }

    fn from_bytes_unchecked(bytes: &Self::Repr) -> CtOption<Self> {
        Self::from_bytes(bytes)
    }

    fn to_bytes(&self) -> Self::Repr {
        CompressedPoint(self.to_affine().to_compressed())
    }
}

#[cfg(test)]
mod tests {
    use group::Group;
    use rand_core::OsRng;

    use super::ProjectivePoint;
    use crate::affine::AffinePoint;
    use crate::scalar::Scalar;

    #[test]
    fn identity_laws() {
        let g = ProjectivePoint::GENERATOR;
        let id = ProjectivePoint::IDENTITY;
        assert_eq!(g.add(&id), g);
        assert_eq!(id.add(&g), g);
        assert_eq!(id.add(&id), id);
        assert_eq!(id.double(), id);
        assert_eq!(g.sub(&g), id);
    }

    #[test]
    fn double_matches_self_addition() {
        let g = ProjectivePoint::GENERATOR;
        assert_eq!(g.add(&g), g.double());
        let four = g.double().double();
        assert_eq!(four, g.add(&g).add(&g).add(&g));
    }

    #[test]
    fn mixed_addition_matches_full() {
        let g = ProjectivePoint::GENERATOR;
        let g2 = g.double();
        assert_eq!(g2.add_mixed(&AffinePoint::GENERATOR), g2.add(&g));
        assert_eq!(g2.add_mixed(&AffinePoint::IDENTITY), g2);
        // Mixed self-addition exercises the doubling case of the
        // complete formulas.
        assert_eq!(g.add_mixed(&AffinePoint::GENERATOR), g.double());
    }

    #[test]
    fn addition_is_commutative_and_associative() {
        let g = ProjectivePoint::GENERATOR;
        let a = g.double();
        let b = a.double();
        assert_eq!(a.add(&b), b.add(&a));
        assert_eq!(a.add(&b).add(&g), a.add(&b.add(&g)));
    }

    #[test]
    fn negation() {
        let g = ProjectivePoint::GENERATOR;
        assert_eq!(g.add(&g.neg()), ProjectivePoint::IDENTITY);
        assert_eq!(g.neg().neg(), g);
        assert_eq!(ProjectivePoint::IDENTITY.neg(), ProjectivePoint::IDENTITY);
    }

    #[test]
    fn to_affine_round_trip() {
        let p = ProjectivePoint::GENERATOR.double();
        let affine = p.to_affine();
        assert!(bool::from(affine.is_on_curve()));
        assert_eq!(ProjectivePoint::from(affine), p);

        let id = ProjectivePoint::IDENTITY.to_affine();
        assert!(bool::from(id.is_identity()));
    }

    #[test]
    fn results_stay_on_curve() {
        let g = ProjectivePoint::GENERATOR;
        let mut p = g;
        for _ in 0..8 {
            p = p.double().add(&g);
            assert!(bool::from(p.is_on_curve()));
        }
    }

    #[test]
    fn generator_is_torsion_element() {
        assert!(bool::from(ProjectivePoint::GENERATOR.is_torsion_element()));
        assert!(bool::from(ProjectivePoint::IDENTITY.is_torsion_element()));
    }

    #[test]
    fn random_points_are_on_curve() {
        let p = ProjectivePoint::random(&mut OsRng);
        let q = ProjectivePoint::random(&mut OsRng);
        assert!(bool::from(p.is_on_curve()));
        assert_ne!(p, q);
    }

    #[test]
    fn group_trait_surface() {
        let g = <ProjectivePoint as Group>::generator();
        assert_eq!(g + g, Group::double(&g));
        assert_eq!(g * Scalar::from_u64(2), Group::double(&g));
    }

    #[test]
    fn affine_operand_surface() {
        use group::Curve;

        let g = ProjectivePoint::GENERATOR;
        let a = Curve::to_affine(&g);

        assert_eq!(g + a, g.double());
        assert_eq!(g + &a, g.double());
        assert_eq!(g - a, ProjectivePoint::IDENTITY);
        assert_eq!(g - &a, ProjectivePoint::IDENTITY);

        let mut p = g;
        p += a;
        p += &a;
        assert_eq!(p, g.double().add(&g));
        p -= a;
        p -= &a;
        assert_eq!(p, g);
    }

    #[test]
    fn group_encoding_round_trip() {
        use group::GroupEncoding;

        let p = ProjectivePoint::GENERATOR.double();
        let decoded = ProjectivePoint::from_bytes(&p.to_bytes()).unwrap();
        assert_eq!(decoded, p);

        let mut bad = p.to_bytes();
        bad.0[0] = 0x07;
        assert!(bool::from(ProjectivePoint::from_bytes(&bad).is_none()));
    }
}

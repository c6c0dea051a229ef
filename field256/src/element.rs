//! Montgomery-form field elements over four 64-bit limbs.

use core::cmp::Ordering;
use core::fmt;
use core::iter::{Product, Sum};
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};
use zeroize::Zeroize;

use crate::arith::{adc, mac, sbb};
use crate::error::{Error, Result};
use crate::params::FieldParams;
use crate::{inv, FIELD_BYTES, WIDE_BYTES};

const fn bytes_to_u64(b: &[u8; 8]) -> u64 {
    ((b[0] as u64) << 56)
        | ((b[1] as u64) << 48)
        | ((b[2] as u64) << 40)
        | ((b[3] as u64) << 32)
        | ((b[4] as u64) << 24)
        | ((b[5] as u64) << 16)
        | ((b[6] as u64) << 8)
        | (b[7] as u64)
}

/// Converts a canonical big-endian encoding into little-endian limbs.
const fn bytes_to_words(b: &[u8; 32]) -> [u64; 4] {
    let w3 = bytes_to_u64(&[b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]);
    let w2 = bytes_to_u64(&[b[8], b[9], b[10], b[11], b[12], b[13], b[14], b[15]]);
    let w1 = bytes_to_u64(&[b[16], b[17], b[18], b[19], b[20], b[21], b[22], b[23]]);
    let w0 = bytes_to_u64(&[b[24], b[25], b[26], b[27], b[28], b[29], b[30], b[31]]);
    [w0, w1, w2, w3]
}

/// An element of the prime field described by `P`, kept in Montgomery form:
/// the limbs store `a * 2^256 mod p`.
///
/// All arithmetic is branch-free. Operations return new owned values;
/// operands are never mutated.
#[derive(Clone, Copy)]
pub struct MontyFieldElement<P: FieldParams> {
    limbs: [u64; 4],
    _params: PhantomData<P>,
}

impl<P: FieldParams> MontyFieldElement<P> {
    /// The additive identity.
    pub const ZERO: Self = Self::from_montgomery([0, 0, 0, 0]);

    /// The multiplicative identity.
    pub const ONE: Self = Self::from_montgomery(P::R);

    /// Builds an element from limbs that are already in Montgomery form.
    pub const fn from_montgomery(limbs: [u64; 4]) -> Self {
        Self {
            limbs,
            _params: PhantomData,
        }
    }

    /// Converts a small integer into the field.
    ///
    /// Inherent calls are fully qualified here and in the other `const fn`s:
    /// a by-value receiver would resolve to the non-const operator impls.
    pub const fn from_u64(v: u64) -> Self {
        Self::mul(
            &Self::from_montgomery([v, 0, 0, 0]),
            &Self::from_montgomery(P::R2),
        )
    }

    /// Parses a canonical big-endian encoding, rejecting values `>= p`.
    ///
    /// The returned flag is false iff the value is out of range.
    pub fn from_bytes(bytes: &[u8; 32]) -> CtOption<Self> {
        let words = bytes_to_words(bytes);

        // In-range words produce a final borrow of u64::MAX when p is
        // subtracted.
        let (_, borrow) = sbb(words[0], P::MODULUS[0], 0);
        let (_, borrow) = sbb(words[1], P::MODULUS[1], borrow);
        let (_, borrow) = sbb(words[2], P::MODULUS[2], borrow);
        let (_, borrow) = sbb(words[3], P::MODULUS[3], borrow);
        let is_some = (borrow as u8) & 1;

        let value = Self::from_montgomery(words).mul(&Self::from_montgomery(P::R2));
        CtOption::new(value, Choice::from(is_some))
    }

    /// Parses a canonical encoding from a slice, reporting width and range
    /// violations as typed errors.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: &[u8; 32] = bytes.try_into().map_err(|_| Error::Length {
            expected: FIELD_BYTES,
            actual: bytes.len(),
        })?;
        Option::<Self>::from(Self::from_bytes(arr)).ok_or(Error::Range)
    }

    /// Reduces an oversized big-endian byte string modulo `p`.
    ///
    /// With 64 uniform input bytes the output distribution is within 2^-128
    /// of uniform, so sampling through this function is rejection-free.
    pub fn from_bytes_wide(bytes: &[u8; 64]) -> Self {
        let mut hi = [0u8; 32];
        let mut lo = [0u8; 32];
        hi.copy_from_slice(&bytes[..32]);
        lo.copy_from_slice(&bytes[32..]);

        // value = hi * 2^256 + lo, so the Montgomery form is
        // lo * R2 / R + hi * R3 / R.
        let hi = Self::from_montgomery(bytes_to_words(&hi)).mul(&Self::from_montgomery(P::R3));
        let lo = Self::from_montgomery(bytes_to_words(&lo)).mul(&Self::from_montgomery(P::R2));
        hi.add(&lo)
    }

    /// Samples a uniform element from the given RNG, surfacing source
    /// failure as [`Error::RandomSample`].
    pub fn try_random(rng: &mut impl RngCore) -> Result<Self> {
        let mut buf = [0u8; WIDE_BYTES];
        rng.try_fill_bytes(&mut buf)
            .map_err(|_| Error::RandomSample)?;
        Ok(Self::from_bytes_wide(&buf))
    }

    /// Samples a uniform element from an infallible RNG.
    pub fn random(rng: &mut impl RngCore) -> Self {
        let mut buf = [0u8; WIDE_BYTES];
        rng.fill_bytes(&mut buf);
        Self::from_bytes_wide(&buf)
    }

    /// Returns the canonical big-endian encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        let words = self.to_canonical();
        let mut out = [0u8; 32];
        out[0..8].copy_from_slice(&words[3].to_be_bytes());
        out[8..16].copy_from_slice(&words[2].to_be_bytes());
        out[16..24].copy_from_slice(&words[1].to_be_bytes());
        out[24..32].copy_from_slice(&words[0].to_be_bytes());
        out
    }

    /// Converts out of Montgomery form, returning canonical little-endian
    /// limbs in `[0, p)`.
    pub const fn to_canonical(&self) -> [u64; 4] {
        let l = self.limbs;
        Self::montgomery_reduce([l[0], l[1], l[2], l[3], 0, 0, 0, 0]).limbs
    }

    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&Self::ZERO)
    }

    pub fn is_one(&self) -> Choice {
        self.ct_eq(&Self::ONE)
    }

    /// Parity of the canonical value.
    pub fn is_odd(&self) -> Choice {
        ((self.to_canonical()[0] & 1) as u8).into()
    }

    /// Constant-time canonical comparison: true iff `self < other`.
    pub fn ct_lt(&self, other: &Self) -> Choice {
        let a = self.to_canonical();
        let b = other.to_canonical();
        let (_, borrow) = sbb(a[0], b[0], 0);
        let (_, borrow) = sbb(a[1], b[1], borrow);
        let (_, borrow) = sbb(a[2], b[2], borrow);
        let (_, borrow) = sbb(a[3], b[3], borrow);
        Choice::from((borrow as u8) & 1)
    }

    /// Returns `self + rhs mod p`.
    pub const fn add(&self, rhs: &Self) -> Self {
        // The sum of two reduced values can occupy five limbs.
        let (w0, carry) = adc(self.limbs[0], rhs.limbs[0], 0);
        let (w1, carry) = adc(self.limbs[1], rhs.limbs[1], carry);
        let (w2, carry) = adc(self.limbs[2], rhs.limbs[2], carry);
        let (w3, w4) = adc(self.limbs[3], rhs.limbs[3], carry);
        Self::sub_inner([w0, w1, w2, w3, w4], P::MODULUS)
    }

    /// Returns `self - rhs mod p`.
    pub const fn sub(&self, rhs: &Self) -> Self {
        Self::sub_inner(
            [
                self.limbs[0],
                self.limbs[1],
                self.limbs[2],
                self.limbs[3],
                0,
            ],
            rhs.limbs,
        )
    }

    /// Returns `-self mod p`.
    pub const fn neg(&self) -> Self {
        Self::sub(&Self::ZERO, self)
    }

    /// Returns `2 * self mod p`.
    pub const fn double(&self) -> Self {
        self.add(self)
    }

    /// Returns `3 * self mod p`.
    pub const fn triple(&self) -> Self {
        Self::add(&Self::double(self), self)
    }

    /// Subtracts a (possibly five-limb) value by `r`, adding `p` back on
    /// underflow. The result is reduced when the input is below `2p`.
    #[inline]
    const fn sub_inner(l: [u64; 5], r: [u64; 4]) -> Self {
        let (w0, borrow) = sbb(l[0], r[0], 0);
        let (w1, borrow) = sbb(l[1], r[1], borrow);
        let (w2, borrow) = sbb(l[2], r[2], borrow);
        let (w3, borrow) = sbb(l[3], r[3], borrow);
        let (_, borrow) = sbb(l[4], 0, borrow);

        // borrow is u64::MAX on underflow and 0 otherwise; use it as a mask
        // to add the modulus back.
        let (w0, carry) = adc(w0, P::MODULUS[0] & borrow, 0);
        let (w1, carry) = adc(w1, P::MODULUS[1] & borrow, carry);
        let (w2, carry) = adc(w2, P::MODULUS[2] & borrow, carry);
        let (w3, _) = adc(w3, P::MODULUS[3] & borrow, carry);

        Self::from_montgomery([w0, w1, w2, w3])
    }

    /// Montgomery reduction of an eight-limb product.
    ///
    /// Handbook of Applied Cryptography, algorithm 14.32.
    #[inline]
    const fn montgomery_reduce(t: [u64; 8]) -> Self {
        let mut r = t;
        let mut carry2 = 0u64;
        let mut i = 0;
        while i < 4 {
            let k = r[i].wrapping_mul(P::INV);
            let (_, mut carry) = mac(r[i], k, P::MODULUS[0], 0);
            let mut j = 1;
            while j < 4 {
                let (w, c) = mac(r[i + j], k, P::MODULUS[j], carry);
                r[i + j] = w;
                carry = c;
                j += 1;
            }
            let (w, c) = adc(r[i + 4], carry2, carry);
            r[i + 4] = w;
            carry2 = c;
            i += 1;
        }
        Self::sub_inner([r[4], r[5], r[6], r[7], carry2], P::MODULUS)
    }

    /// Returns `self * rhs mod p`: schoolbook product followed by Montgomery
    /// reduction (HAC 14.36/14.32).
    pub const fn mul(&self, rhs: &Self) -> Self {
        let a = &self.limbs;
        let b = &rhs.limbs;
        let mut t = [0u64; 8];
        let mut i = 0;
        while i < 4 {
            let mut carry = 0u64;
            let mut j = 0;
            while j < 4 {
                let (w, c) = mac(t[i + j], a[i], b[j], carry);
                t[i + j] = w;
                carry = c;
                j += 1;
            }
            t[i + 4] = carry;
            i += 1;
        }
        Self::montgomery_reduce(t)
    }

    /// Returns `self^2 mod p`.
    pub const fn square(&self) -> Self {
        self.mul(self)
    }

    /// Constant-time exponentiation by a fixed-width little-endian exponent.
    pub fn pow(&self, exp: &[u64; 4]) -> Self {
        let mut res = Self::ONE;
        for limb in exp.iter().rev() {
            for j in (0..64).rev() {
                res = res.square();
                let bit = Choice::from(((limb >> j) & 1) as u8);
                let with_base = res.mul(self);
                res = Self::conditional_select(&res, &with_base, bit);
            }
        }
        res
    }

    /// Variable-time exponentiation; only for public exponents.
    pub fn pow_vartime(&self, exp: &[u64; 4]) -> Self {
        let mut res = Self::ONE;
        for limb in exp.iter().rev() {
            for j in (0..64).rev() {
                res = res.square();
                if (limb >> j) & 1 == 1 {
                    res = res.mul(self);
                }
            }
        }
        res
    }

    /// Computes the multiplicative inverse via a fixed count of
    /// Bernstein-Yang division steps.
    ///
    /// The flag is false iff `self` is zero; control flow and memory access
    /// do not depend on the value.
    pub fn invert(&self) -> CtOption<Self> {
        // The divstep runs on the Montgomery residue r = aR as a plain
        // integer; r^-1 * R^3 / R = a^-1 * R restores Montgomery form.
        let raw = inv::modinv::<P>(&self.limbs);
        let value = Self::from_montgomery(raw).mul(&Self::from_montgomery(P::R3));
        CtOption::new(value, !self.is_zero())
    }
}

impl<P: FieldParams> ConditionallySelectable for MontyFieldElement<P> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self::from_montgomery([
            u64::conditional_select(&a.limbs[0], &b.limbs[0], choice),
            u64::conditional_select(&a.limbs[1], &b.limbs[1], choice),
            u64::conditional_select(&a.limbs[2], &b.limbs[2], choice),
            u64::conditional_select(&a.limbs[3], &b.limbs[3], choice),
        ])
    }
}

impl<P: FieldParams> ConstantTimeEq for MontyFieldElement<P> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.limbs[0].ct_eq(&other.limbs[0])
            & self.limbs[1].ct_eq(&other.limbs[1])
            & self.limbs[2].ct_eq(&other.limbs[2])
            & self.limbs[3].ct_eq(&other.limbs[3])
    }
}

impl<P: FieldParams> PartialEq for MontyFieldElement<P> {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<P: FieldParams> Eq for MontyFieldElement<P> {}

impl<P: FieldParams> PartialOrd for MontyFieldElement<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: FieldParams> Ord for MontyFieldElement<P> {
    /// Canonical-value ordering. Variable-time; order public values only.
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.to_canonical();
        let b = other.to_canonical();
        for i in (0..4).rev() {
            match a[i].cmp(&b[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl<P: FieldParams> Default for MontyFieldElement<P> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<P: FieldParams> fmt::Debug for MontyFieldElement<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x", P::NAME)?;
        for byte in self.to_bytes() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

impl<P: FieldParams> Zeroize for MontyFieldElement<P> {
    fn zeroize(&mut self) {
        self.limbs.zeroize();
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $inner:ident) => {
        impl<P: FieldParams> $trait for MontyFieldElement<P> {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                MontyFieldElement::$inner(&self, &rhs)
            }
        }

        impl<P: FieldParams> $trait<&MontyFieldElement<P>> for MontyFieldElement<P> {
            type Output = Self;

            fn $method(self, rhs: &Self) -> Self {
                MontyFieldElement::$inner(&self, rhs)
            }
        }

        impl<P: FieldParams> $trait for &MontyFieldElement<P> {
            type Output = MontyFieldElement<P>;

            fn $method(self, rhs: Self) -> MontyFieldElement<P> {
                MontyFieldElement::$inner(self, rhs)
            }
        }

        impl<P: FieldParams> $assign_trait for MontyFieldElement<P> {
            fn $assign_method(&mut self, rhs: Self) {
                *self = MontyFieldElement::$inner(self, &rhs);
            }
        }

        impl<P: FieldParams> $assign_trait<&MontyFieldElement<P>> for MontyFieldElement<P> {
            fn $assign_method(&mut self, rhs: &Self) {
                *self = MontyFieldElement::$inner(self, rhs);
            }
        }
    };
}

impl_binop!(Add, add, AddAssign, add_assign, add);
impl_binop!(Sub, sub, SubAssign, sub_assign, sub);
impl_binop!(Mul, mul, MulAssign, mul_assign, mul);

impl<P: FieldParams> Neg for MontyFieldElement<P> {
    type Output = Self;

    fn neg(self) -> Self {
        MontyFieldElement::neg(&self)
    }
}

impl<P: FieldParams> Neg for &MontyFieldElement<P> {
    type Output = MontyFieldElement<P>;

    fn neg(self) -> MontyFieldElement<P> {
        MontyFieldElement::neg(self)
    }
}

impl<P: FieldParams> Sum for MontyFieldElement<P> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc.add(&x))
    }
}

impl<'a, P: FieldParams> Sum<&'a MontyFieldElement<P>> for MontyFieldElement<P> {
    fn sum<I: Iterator<Item = &'a MontyFieldElement<P>>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc.add(x))
    }
}

impl<P: FieldParams> Product for MontyFieldElement<P> {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc.mul(&x))
    }
}

impl<'a, P: FieldParams> Product<&'a MontyFieldElement<P>> for MontyFieldElement<P> {
    fn product<I: Iterator<Item = &'a MontyFieldElement<P>>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc.mul(x))
    }
}

//! Scalar multiplication and multi-scalar multiplication.

use core::ops::{Mul, MulAssign};

use subtle::{Choice, ConditionallySelectable};

use crate::error::{Error, Result};
use crate::projective::ProjectivePoint;
use crate::scalar::Scalar;

impl ProjectivePoint {
    /// Constant-time `[k] self`.
    ///
    /// Fixed-window radix-16: a 16-entry table of small multiples is
    /// scanned with `conditional_assign` for every 4-bit window of the
    /// scalar, from the most significant window down. The sequence of
    /// field operations is the same for every scalar.
    pub fn mul(&self, k: &Scalar) -> Self {
        let k = k.to_le_bytes();

        let mut pc = [Self::IDENTITY; 16];
        pc[1] = *self;

        for i in 2..16 {
            pc[i] = if i % 2 == 0 {
                pc[i / 2].double()
            } else {
                pc[i - 1].add(self)
            };
        }

        let mut q = Self::IDENTITY;
        let mut pos = 256 - 4;

        loop {
            let slot = (k[pos >> 3] >> (pos & 7)) & 0xf;

            let mut t = Self::IDENTITY;

            for (i, entry) in pc.iter().enumerate().skip(1) {
                t.conditional_assign(
                    entry,
                    Choice::from(((slot as usize ^ i).wrapping_sub(1) >> 8) as u8 & 1),
                );
            }

            q = q.add(&t);

            if pos == 0 {
                break;
            }

            q = q.double().double().double().double();
            pos -= 4;
        }

        q
    }

    /// Variable-time `sum(scalars[i] * points[i])` by the Pippenger bucket
    /// method with 4-bit windows.
    ///
    /// Inputs are treated as public; do not use with secret scalars.
    pub fn multiscalar_mul(scalars: &[Scalar], points: &[Self]) -> Result<Self> {
        if scalars.is_empty() || scalars.len() != points.len() {
            return Err(Error::LengthMismatch);
        }

        let digits: Vec<[u8; 32]> = scalars.iter().map(Scalar::to_le_bytes).collect();

        let mut acc = Self::IDENTITY;
        for window in (0..64).rev() {
            for _ in 0..4 {
                acc = acc.double();
            }

            // Buckets 1..=15; bucket 0 contributes nothing.
            let mut buckets = [Self::IDENTITY; 16];
            for (bytes, point) in digits.iter().zip(points) {
                let idx = ((bytes[window >> 1] >> ((window & 1) << 2)) & 0xf) as usize;
                if idx != 0 {
                    buckets[idx] += point;
                }
            }

            // sum_{i=1}^{15} i * bucket[i] via a running suffix sum.
            let mut running = Self::IDENTITY;
            let mut window_sum = Self::IDENTITY;
            for bucket in buckets[1..].iter().rev() {
                running += bucket;
                window_sum += running;
            }
            acc += window_sum;
        }

        Ok(acc)
    }
}

impl Mul<Scalar> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn mul(self, scalar: Scalar) -> ProjectivePoint {
        ProjectivePoint::mul(&self, &scalar)
    }
}

impl Mul<&Scalar> for ProjectivePoint {
    type Output = ProjectivePoint;

    fn mul(self, scalar: &Scalar) -> ProjectivePoint {
        ProjectivePoint::mul(&self, scalar)
    }
}

impl Mul<&Scalar> for &ProjectivePoint {
    type Output = ProjectivePoint;

    fn mul(self, scalar: &Scalar) -> ProjectivePoint {
        ProjectivePoint::mul(self, scalar)
    }
}

impl MulAssign<Scalar> for ProjectivePoint {
    fn mul_assign(&mut self, scalar: Scalar) {
        *self = ProjectivePoint::mul(self, &scalar);
    }
}

impl MulAssign<&Scalar> for ProjectivePoint {
    fn mul_assign(&mut self, scalar: &Scalar) {
        *self = ProjectivePoint::mul(self, scalar);
    }
}

//! Macros shared by the two field newtypes.

/// Implements the arithmetic operator surface `ff::Field` expects for a
/// wrapper around a [`field256::MontyFieldElement`], delegating to the
/// inner element. Also wires up the `subtle` traits and `Zeroize`.
macro_rules! impl_field_newtype_ops {
    ($name:ident) => {
        impl core::ops::Add for $name {
            type Output = $name;

            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl core::ops::Add<&$name> for $name {
            type Output = $name;

            fn add(self, rhs: &$name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl core::ops::Add<&$name> for &$name {
            type Output = $name;

            fn add(self, rhs: &$name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl core::ops::AddAssign for $name {
            fn add_assign(&mut self, rhs: $name) {
                self.0 += rhs.0;
            }
        }

        impl core::ops::AddAssign<&$name> for $name {
            fn add_assign(&mut self, rhs: &$name) {
                self.0 += rhs.0;
            }
        }

        impl core::ops::Sub for $name {
            type Output = $name;

            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl core::ops::Sub<&$name> for $name {
            type Output = $name;

            fn sub(self, rhs: &$name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl core::ops::Sub<&$name> for &$name {
            type Output = $name;

            fn sub(self, rhs: &$name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl core::ops::SubAssign for $name {
            fn sub_assign(&mut self, rhs: $name) {
                self.0 -= rhs.0;
            }
        }

        impl core::ops::SubAssign<&$name> for $name {
            fn sub_assign(&mut self, rhs: &$name) {
                self.0 -= rhs.0;
            }
        }

        impl core::ops::Mul for $name {
            type Output = $name;

            fn mul(self, rhs: $name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl core::ops::Mul<&$name> for $name {
            type Output = $name;

            fn mul(self, rhs: &$name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl core::ops::Mul<&$name> for &$name {
            type Output = $name;

            fn mul(self, rhs: &$name) -> $name {
                $name(self.0 * rhs.0)
            }
        }

        impl core::ops::MulAssign for $name {
            fn mul_assign(&mut self, rhs: $name) {
                self.0 *= rhs.0;
            }
        }

        impl core::ops::MulAssign<&$name> for $name {
            fn mul_assign(&mut self, rhs: &$name) {
                self.0 *= rhs.0;
            }
        }

        impl core::ops::Neg for $name {
            type Output = $name;

            fn neg(self) -> $name {
                $name(-self.0)
            }
        }

        impl core::ops::Neg for &$name {
            type Output = $name;

            fn neg(self) -> $name {
                $name(-self.0)
            }
        }

        impl core::iter::Sum for $name {
            fn sum<I: Iterator<Item = $name>>(iter: I) -> $name {
                iter.fold($name::ZERO, |acc, x| acc + x)
            }
        }

        impl<'a> core::iter::Sum<&'a $name> for $name {
            fn sum<I: Iterator<Item = &'a $name>>(iter: I) -> $name {
                iter.fold($name::ZERO, |acc, x| acc + x)
            }
        }

        impl core::iter::Product for $name {
            fn product<I: Iterator<Item = $name>>(iter: I) -> $name {
                iter.fold($name::ONE, |acc, x| acc * x)
            }
        }

        impl<'a> core::iter::Product<&'a $name> for $name {
            fn product<I: Iterator<Item = &'a $name>>(iter: I) -> $name {
                iter.fold($name::ONE, |acc, x| acc * x)
            }
        }

        impl subtle::ConditionallySelectable for $name {
            fn conditional_select(a: &$name, b: &$name, choice: subtle::Choice) -> $name {
                $name(subtle::ConditionallySelectable::conditional_select(
                    &a.0, &b.0, choice,
                ))
            }
        }

        impl subtle::ConstantTimeEq for $name {
            fn ct_eq(&self, other: &$name) -> subtle::Choice {
                self.0.ct_eq(&other.0)
            }
        }

        impl zeroize::Zeroize for $name {
            fn zeroize(&mut self) {
                self.0.zeroize();
            }
        }
    };
}

pub(crate) use impl_field_newtype_ops;

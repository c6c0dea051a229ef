//! Per-field parameterization of the Montgomery engine.

use core::fmt::Debug;

/// Constants describing a 256-bit prime field.
///
/// Implementors are zero-sized marker types; all constants are precomputed
/// from the modulus `p` (values are plain hex unless stated otherwise):
///
/// - `R = 2^256 mod p`, `R2 = 2^512 mod p`, `R3 = 2^768 mod p`
/// - `INV = -(p^-1) mod 2^64`
/// - `S` is the 2-adic valuation of `p - 1`
/// - when `S == 1` (i.e. `p ≡ 3 mod 4`), `SQRT_EXP = (p + 1) / 4` and
///   `ROOT_OF_UNITY` is unused (conventionally zero)
/// - when `S > 1`, `SQRT_EXP = (t - 1) / 2` for the odd `t = (p - 1) / 2^S`
///   and `ROOT_OF_UNITY` is `g^t` in Montgomery form for a fixed
///   non-residue `g`
///
/// Limb arrays are little-endian: index 0 holds the least significant limb.
pub trait FieldParams: Copy + Clone + Debug + Eq + Send + Sync + 'static {
    /// Human-readable field name, used in `Debug` output.
    const NAME: &'static str;

    /// The prime modulus `p`.
    const MODULUS: [u64; 4];

    /// `2^256 mod p`; the Montgomery form of one.
    const R: [u64; 4];

    /// `2^512 mod p`.
    const R2: [u64; 4];

    /// `2^768 mod p`.
    const R3: [u64; 4];

    /// `-(p^-1) mod 2^64`.
    const INV: u64;

    /// 2-adic valuation of `p - 1`.
    const S: u32;

    /// Square-root exponent; see the trait docs for its two meanings.
    const SQRT_EXP: [u64; 4];

    /// `g^t` in Montgomery form for a fixed non-residue `g`; zero when
    /// `S == 1`.
    const ROOT_OF_UNITY: [u64; 4];
}

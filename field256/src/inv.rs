//! Constant-time modular inversion via Bernstein-Yang division steps.
//!
//! Values are carried in a signed-digit representation of five 62-bit limbs.
//! Ten batches of 59 division steps (590 total, enough for any 256-bit
//! modulus) are applied unconditionally; each batch computes a 2x2
//! transition matrix with branch-free bit arithmetic and then applies it to
//! the full-width state. The iteration count and memory access pattern are
//! independent of the input value.

use crate::params::FieldParams;

const M62: u64 = u64::MAX >> 2;

/// 2x2 transition matrix produced by a batch of 59 divsteps, scaled by 2^62.
struct Trans2x2 {
    u: i64,
    v: i64,
    q: i64,
    r: i64,
}

/// Unpacks four 64-bit limbs into five signed 62-bit digits.
const fn to_signed62(a: &[u64; 4]) -> [i64; 5] {
    [
        (a[0] & M62) as i64,
        (((a[0] >> 62) | (a[1] << 2)) & M62) as i64,
        (((a[1] >> 60) | (a[2] << 4)) & M62) as i64,
        (((a[2] >> 58) | (a[3] << 6)) & M62) as i64,
        (a[3] >> 56) as i64,
    ]
}

/// Packs five signed 62-bit digits (representing a value in `[0, 2^256)`)
/// back into 64-bit limbs.
const fn from_signed62(a: &[i64; 5]) -> [u64; 4] {
    let (a0, a1, a2, a3, a4) = (
        a[0] as u64,
        a[1] as u64,
        a[2] as u64,
        a[3] as u64,
        a[4] as u64,
    );
    [
        a0 | (a1 << 62),
        (a1 >> 2) | (a2 << 60),
        (a2 >> 4) | (a3 << 58),
        (a3 >> 6) | (a4 << 56),
    ]
}

/// Runs 59 division steps on the bottom limbs of `f` and `g`, returning the
/// updated eta parameter and the transition matrix.
///
/// The matrix entries start at 8 (a 2^3 pre-scale) so that 59 steps yield an
/// exact 2^62 scaling while every intermediate stays within an `i64`.
fn divsteps_59(mut zeta: i64, f0: u64, g0: u64) -> (i64, Trans2x2) {
    let mut u = 8u64;
    let mut v = 0u64;
    let mut q = 0u64;
    let mut r = 8u64;
    let mut f = f0;
    let mut g = g0;

    for _ in 3..62 {
        let mut c1 = (zeta >> 63) as u64;
        let c2 = (g & 1).wrapping_neg();

        let x = (f ^ c1).wrapping_sub(c1);
        let y = (u ^ c1).wrapping_sub(c1);
        let z = (v ^ c1).wrapping_sub(c1);

        g = g.wrapping_add(x & c2);
        q = q.wrapping_add(y & c2);
        r = r.wrapping_add(z & c2);

        c1 &= c2;
        zeta = ((zeta as u64 ^ c1).wrapping_sub(1)) as i64;

        f = f.wrapping_add(g & c1);
        u = u.wrapping_add(q & c1);
        v = v.wrapping_add(r & c1);

        g >>= 1;
        u <<= 1;
        v <<= 1;
    }

    (
        zeta,
        Trans2x2 {
            u: u as i64,
            v: v as i64,
            q: q as i64,
            r: r as i64,
        },
    )
}

/// Applies the transition matrix to `(f, g)`, shifting out the 62 bits the
/// divsteps consumed.
fn update_fg(f: &mut [i64; 5], g: &mut [i64; 5], t: &Trans2x2) {
    let (u, v, q, r) = (t.u as i128, t.v as i128, t.q as i128, t.r as i128);

    let mut cf = u * f[0] as i128 + v * g[0] as i128;
    let mut cg = q * f[0] as i128 + r * g[0] as i128;
    // The bottom 62 bits are zero by construction of the matrix.
    cf >>= 62;
    cg >>= 62;

    for i in 1..5 {
        cf += u * f[i] as i128 + v * g[i] as i128;
        cg += q * f[i] as i128 + r * g[i] as i128;
        f[i - 1] = (cf as i64) & M62 as i64;
        g[i - 1] = (cg as i64) & M62 as i64;
        cf >>= 62;
        cg >>= 62;
    }
    f[4] = cf as i64;
    g[4] = cg as i64;
}

/// Applies the transition matrix to the Bezout coefficients `(d, e)`,
/// reducing modulo the field prime as it goes. `inv62` is `p^-1 mod 2^62`.
fn update_de(d: &mut [i64; 5], e: &mut [i64; 5], t: &Trans2x2, modulus: &[i64; 5], inv62: u64) {
    let (u, v, q, r) = (t.u, t.v, t.q, t.r);

    // Sign masks compensate for possibly negative d/e inputs.
    let sd = d[4] >> 63;
    let se = e[4] >> 63;
    let mut md = (u & sd).wrapping_add(v & se);
    let mut me = (q & sd).wrapping_add(r & se);

    let mut cd = u as i128 * d[0] as i128 + v as i128 * e[0] as i128;
    let mut ce = q as i128 * d[0] as i128 + r as i128 * e[0] as i128;

    // Pick multiples of the modulus that clear the low 62 bits.
    md = md.wrapping_sub(
        (inv62
            .wrapping_mul(cd as u64)
            .wrapping_add(md as u64)
            & M62) as i64,
    );
    me = me.wrapping_sub(
        (inv62
            .wrapping_mul(ce as u64)
            .wrapping_add(me as u64)
            & M62) as i64,
    );

    cd += modulus[0] as i128 * md as i128;
    ce += modulus[0] as i128 * me as i128;
    cd >>= 62;
    ce >>= 62;

    for i in 1..5 {
        cd += u as i128 * d[i] as i128 + v as i128 * e[i] as i128;
        ce += q as i128 * d[i] as i128 + r as i128 * e[i] as i128;
        if modulus[i] != 0 {
            cd += modulus[i] as i128 * md as i128;
            ce += modulus[i] as i128 * me as i128;
        }
        d[i - 1] = (cd as i64) & M62 as i64;
        e[i - 1] = (ce as i64) & M62 as i64;
        cd >>= 62;
        ce >>= 62;
    }
    d[4] = cd as i64;
    e[4] = ce as i64;
}

/// Brings `r` from `(-2p, p)` into `[0, p)`, negating first when `sign` is
/// negative.
fn normalize(r: &mut [i64; 5], sign: i64, modulus: &[i64; 5]) {
    let cond_add = r[4] >> 63;
    for i in 0..5 {
        r[i] = r[i].wrapping_add(modulus[i] & cond_add);
    }

    let cond_negate = sign >> 63;
    for i in 0..5 {
        r[i] = (r[i] ^ cond_negate).wrapping_sub(cond_negate);
    }
    for i in 0..4 {
        r[i + 1] = r[i + 1].wrapping_add(r[i] >> 62);
        r[i] &= M62 as i64;
    }

    let cond_add = r[4] >> 63;
    for i in 0..5 {
        r[i] = r[i].wrapping_add(modulus[i] & cond_add);
    }
    for i in 0..4 {
        r[i + 1] = r[i + 1].wrapping_add(r[i] >> 62);
        r[i] &= M62 as i64;
    }

    debug_assert!(r[4] >> 62 == 0);
}

/// Computes `x^-1 mod p` for `x` in `[0, p)` given as plain limbs, with a
/// fixed iteration count. Returns zero for a zero input.
pub(crate) fn modinv<P: FieldParams>(x: &[u64; 4]) -> [u64; 4] {
    let modulus = to_signed62(&P::MODULUS);
    let inv62 = P::INV.wrapping_neg() & M62;

    let mut d = [0i64; 5];
    let mut e = [1i64, 0, 0, 0, 0];
    let mut f = modulus;
    let mut g = to_signed62(x);
    let mut zeta = -1i64;

    for _ in 0..10 {
        let (new_zeta, t) = divsteps_59(zeta, f[0] as u64, g[0] as u64);
        zeta = new_zeta;
        update_de(&mut d, &mut e, &t, &modulus, inv62);
        update_fg(&mut f, &mut g, &t);
    }

    // g is now zero and f holds gcd(x, p) = +/-1; d carries the inverse up
    // to that sign.
    normalize(&mut d, f[4], &modulus);
    from_signed62(&d)
}

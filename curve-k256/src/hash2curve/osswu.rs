//! Simplified SWU map for secp256k1 (RFC 9380 §6.6.3 and §8.7).
//!
//! secp256k1 has `a = 0`, so the map runs on the 3-isogenous curve
//! `E': y^2 = x^3 + A'x + B'` with `B' = 1771` and `Z = -11`, and the
//! result is carried back through the isogeny. All constants are in
//! Montgomery form.

use subtle::{ConditionallySelectable, ConstantTimeEq};

use crate::affine::AffinePoint;
use crate::field::FieldElement;

/// `A'` of the isogenous curve,
/// `0x3f8731abdd661adca08a5558f0f5d272e953d363cb6f0e5d405447c01a444533`.
const OSSWU_A: FieldElement = FieldElement::from_monty([
    0xdb71_4ce7_b184_44a1,
    0x4458_ce38_a32a_19a2,
    0xa0e5_8ae2_837b_fbf0,
    0x505a_abc4_9336_d959,
]);

/// `B' = 1771` of the isogenous curve.
const OSSWU_B: FieldElement = FieldElement::from_monty([0x0000_06eb_001a_66db, 0, 0, 0]);

/// `Z = -11`, the non-square of the suite.
const OSSWU_Z: FieldElement = FieldElement::from_monty([
    0xffff_fff3_ffff_d234,
    0xffff_ffff_ffff_ffff,
    0xffff_ffff_ffff_ffff,
    0xffff_ffff_ffff_ffff,
]);

/// `c1 = (p - 3) / 4`, a plain exponent.
const OSSWU_C1: [u64; 4] = [
    0xffff_ffff_bfff_ff0b,
    0xffff_ffff_ffff_ffff,
    0xffff_ffff_ffff_ffff,
    0x3fff_ffff_ffff_ffff,
];

/// `c2 = sqrt(-Z^3)`.
const OSSWU_C2: FieldElement = FieldElement::from_monty([
    0x5b57_ba53_a30d_1520,
    0x908f_7cef_34a7_62eb,
    0x190b_0ffe_0684_60c8,
    0x98a9_828e_8f00_ff62,
]);

/// Numerator coefficients of the isogeny x-map, constant term first.
const ISO_XNUM: [FieldElement; 4] = [
    FieldElement::from_monty([0x0000_003b_1c72_a8b4, 0, 0, 0]),
    FieldElement::from_monty([
        0xd5bd_51a1_7b2e_df46,
        0x2cc0_6f7c_86b8_6bcd,
        0x50b3_7e74_f329_4a00,
        0xeb32_314a_9da7_3679,
    ]),
    FieldElement::from_monty([
        0x48c1_8b1b_0d21_91bd,
        0x5a3f_74c2_9bfc_cce3,
        0xbe55_a02e_5e8b_d357,
        0x09bf_218d_11ff_f905,
    ]),
    FieldElement::from_monty([0x0000_0000_1c71_c789, 0, 0, 0]),
];

/// Denominator of the x-map; monic of degree 2, so the leading 1 is
/// implicit.
const ISO_XDEN: [FieldElement; 2] = [
    FieldElement::from_monty([
        0x8af7_9c1f_fdf1_e7fa,
        0xb84b_c222_3573_5eb5,
        0x82ee_5655_a55a_ce04,
        0xce4b_32de_a0a2_becb,
    ]),
    FieldElement::from_monty([
        0x8ecd_e3f3_762e_1fa5,
        0x2c3b_1ad7_7be3_33fd,
        0xb102_a1a1_52ea_6e12,
        0x57b8_2df5_a1ff_c133,
    ]),
];

/// Numerator coefficients of the isogeny y-map, constant term first.
const ISO_YNUM: [FieldElement; 4] = [
    FieldElement::from_monty([
        0xffff_ffce_425e_12c3,
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_ffff_ffff,
    ]),
    FieldElement::from_monty([
        0xba60_d5fd_6e56_922e,
        0x4ec1_98c8_98a4_35f2,
        0x27e7_7a57_7b97_64ab,
        0xb3b8_0a11_9765_1d12,
    ]),
    FieldElement::from_monty([
        0xa460_c58d_0690_c6f6,
        0xad1f_ba61_4dfe_6671,
        0xdf2a_d017_2f45_e9ab,
        0x84df_90c6_88ff_fc82,
    ]),
    FieldElement::from_monty([0x0000_0000_097b_4283, 0, 0, 0]),
];

/// Denominator of the y-map; monic of degree 3, leading 1 implicit.
const ISO_YDEN: [FieldElement; 3] = [
    FieldElement::from_monty([
        0xffff_fd0a_fff4_b6fb,
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_ffff_ffff,
    ]),
    FieldElement::from_monty([
        0xa0e6_d461_f9d5_bf90,
        0x28e3_4666_a05a_1c20,
        0x88cb_0300_f010_6a0e,
        0x6ae1_989b_e1e8_3c62,
    ]),
    FieldElement::from_monty([
        0x5634_d5ed_b145_3160,
        0x4258_a843_39d4_cdfc,
        0x8983_f271_fc5f_a51b,
        0x0394_44f0_72ff_a1cd,
    ]),
];

/// Maps a field element onto the curve. Constant time; never fails.
pub fn map_to_curve(u: &FieldElement) -> AffinePoint {
    let (x, y) = osswu(u);
    iso_map(x, y)
}

/// The simplified SWU map onto `E'`, straight-line as in §F.2.1.2.
fn osswu(u: &FieldElement) -> (FieldElement, FieldElement) {
    let tv1 = u.square();
    let tv3 = OSSWU_Z * tv1;
    let mut tv2 = tv3.square();
    let mut xd = tv2 + tv3;
    let x1n = OSSWU_B * (xd + FieldElement::ONE);
    xd *= -OSSWU_A;
    xd.conditional_assign(&(OSSWU_Z * OSSWU_A), xd.is_zero());
    tv2 = xd.square();
    let gxd = tv2 * xd;
    tv2 *= OSSWU_A;
    let gx1 = x1n * (tv2 + x1n.square()) + OSSWU_B * gxd;
    let mut tv4 = gxd.square();
    tv2 = gx1 * gxd;
    tv4 *= tv2;
    let y1 = tv4.pow(&OSSWU_C1) * tv2;
    let x2n = tv3 * x1n;
    let y2 = y1 * OSSWU_C2 * tv1 * u;
    tv2 = y1.square() * gxd;

    let e2 = tv2.ct_eq(&gx1);

    // xd is never zero after the fixup above.
    let x = FieldElement::conditional_select(&x2n, &x1n, e2)
        * xd.invert().unwrap_or(FieldElement::ZERO);
    let mut y = FieldElement::conditional_select(&y2, &y1, e2);
    y.conditional_assign(&-y, u.sgn0() ^ y.sgn0());
    (x, y)
}

/// Evaluates the 3-isogeny `E' -> E` at an affine point of `E'`.
fn iso_map(x: FieldElement, y: FieldElement) -> AffinePoint {
    let horner = |coeffs: &[FieldElement]| {
        coeffs
            .iter()
            .rev()
            .fold(FieldElement::ZERO, |acc, c| acc * x + *c)
    };

    let x_num = horner(&ISO_XNUM);
    let x_den = (x + ISO_XDEN[1]) * x + ISO_XDEN[0];
    let y_num = horner(&ISO_YNUM);
    let y_den = ((x + ISO_YDEN[2]) * x + ISO_YDEN[1]) * x + ISO_YDEN[0];

    // One inversion for both denominators; SSWU outputs never land on
    // the isogeny's poles.
    let inv = (x_den * y_den).invert().unwrap_or(FieldElement::ZERO);

    AffinePoint {
        x: x_num * y_den * inv,
        y: y * y_num * x_den * inv,
        infinity: 0,
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::{map_to_curve, osswu, OSSWU_A, OSSWU_B, OSSWU_C2, OSSWU_Z};
    use crate::field::FieldElement;

    #[test]
    fn suite_constants_consistent() {
        // Z = -11.
        assert_eq!(OSSWU_Z, -FieldElement::from_u64(11));
        assert_eq!(OSSWU_B, FieldElement::from_u64(1771));
        // c2^2 = -Z^3 = 1331.
        assert_eq!(OSSWU_C2.square(), FieldElement::from_u64(1331));
    }

    #[test]
    fn osswu_output_is_on_isogenous_curve() {
        for n in [1u64, 2, 3, 0xdead_beef] {
            let (x, y) = osswu(&FieldElement::from_u64(n));
            let lhs = y.square();
            let rhs = (x.square() + OSSWU_A) * x + OSSWU_B;
            assert_eq!(lhs, rhs);
        }
    }

    #[test]
    fn map_to_curve_known_vector() {
        // u_0 of the RFC 9380 J.8.1 empty-message vector maps to Q0.
        let u = FieldElement::from_bytes(&hex!(
            "6b0f9910dd2ba71c78f2ee9f04d73b5f4c5f7fc773a701abea1e573cab002fb3"
        ))
        .unwrap();
        let q = map_to_curve(&u);
        assert_eq!(
            q.x().to_bytes(),
            hex!("74519ef88b32b425a095e4ebcc84d81b64e9e2c2675340a720bb1a1857b99f1e")
        );
        assert_eq!(
            q.y().to_bytes(),
            hex!("c174fa322ab7c192e11748beed45b508e9fdb1ce046dee9c2cd3a2a86b410936")
        );
        assert!(bool::from(q.is_on_curve()));
    }
}

//! X25519: the Montgomery-ladder Diffie-Hellman function on Curve25519,
//! the birational twin of the Edwards curve used for signing.

use crate::error::{Ed25519Error, Ed25519Result};
use crate::field::FieldElement;

/// `A = 486662` as `a24 = (A - 2) / 4 = 121665`.
fn a24() -> FieldElement {
    let mut limbs = [0i64; 10];
    limbs[0] = 121665;
    FieldElement(limbs).reduce()
}

/// Clears the low 3 bits and fixes bit 254, per RFC 7748.
#[must_use]
pub fn clamp_scalar(mut bytes: [u8; 32]) -> [u8; 32] {
    bytes[0] &= 248;
    bytes[31] &= 127;
    bytes[31] |= 64;
    bytes
}

/// Converts an Edwards `y` coordinate to the Montgomery `u` coordinate
/// of the birationally equivalent point: `u = (1 + y) / (1 - y)`.
#[must_use]
pub fn edwards_y_to_montgomery_u(y: &FieldElement) -> FieldElement {
    let one = FieldElement::one();
    let numerator = (one + *y).reduce();
    let denominator = (one - *y).reduce();
    (numerator * denominator.invert()).reduce()
}

fn cswap(swap: u8, a: &mut FieldElement, b: &mut FieldElement) {
    FieldElement::conditional_swap(a, b, swap);
}

/// Runs the constant-time Montgomery ladder: `clamped_scalar * u`.
///
/// # Errors
///
/// Returns [`Ed25519Error::InvalidKey`] if the result is the all-zero
/// u-coordinate, meaning `u` was a low-order point.
pub fn ladder(clamped_scalar: &[u8; 32], u_bytes: &[u8; 32]) -> Ed25519Result<[u8; 32]> {
    let mut u_bytes = *u_bytes;
    u_bytes[31] &= 0x7f;
    let u = FieldElement::from_bytes(&u_bytes);

    let mut x1 = u;
    let mut x2 = FieldElement::one();
    let mut z2 = FieldElement::zero();
    let mut x3 = u;
    let mut z3 = FieldElement::one();
    let mut swap: u8 = 0;

    for t in (0..255).rev() {
        let k_t = (clamped_scalar[t / 8] >> (t % 8)) & 1;
        swap ^= k_t;
        cswap(swap, &mut x2, &mut x3);
        cswap(swap, &mut z2, &mut z3);
        swap = k_t;

        let a = (x2 + z2).reduce();
        let b = (x2 - z2).reduce();
        let c = (x3 + z3).reduce();
        let d = (x3 - z3).reduce();
        let aa = a.square().reduce();
        let bb = b.square().reduce();
        let da = (d * a).reduce();
        let cb = (c * b).reduce();
        let e = (aa - bb).reduce();

        x2 = (aa * bb).reduce();
        z2 = (e * (aa + a24() * e)).reduce();
        x3 = (da + cb).square().reduce();
        z3 = (x1 * (da - cb).square()).reduce();
    }

    cswap(swap, &mut x2, &mut x3);
    cswap(swap, &mut z2, &mut z3);

    let result = (x2 * z2.invert()).reduce();
    let out = result.to_bytes();
    if out.iter().all(|&b| b == 0) {
        return Err(Ed25519Error::InvalidKey);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex32(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        hex::decode_to_slice(s, &mut out).unwrap();
        out
    }

    #[test]
    fn rfc7748_scalar_mult_vector_1() {
        let scalar = clamp_scalar(hex32(
            "a546e36bf0527c9d3b16154b82465edd62144c0ac1fc5a18506a2244ba449ac4",
        ));
        let u = hex32("e6db6867583030db3594c1a424b15f7c726624ec26b3353b10a903a6d0ab1c4c");
        let expected = hex32("c3da55379de9c6908e94ea4df28d084f32eccf03491c71f754b4075577a28552");
        let got = ladder(&scalar, &u).unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn rfc7748_scalar_mult_vector_2() {
        let scalar = clamp_scalar(hex32(
            "4b66e9d4d1b4673c5ad22691957d6af5c11b6421e0ea01d42ca4169e7918ba0d",
        ));
        let u = hex32("e5210f12786811d3f4b7959d0538ae2c31dbe7106fc03c3efc4cd549c715a493");
        let expected = hex32("95cbde9476e8907d7aade45cb4b873f88b595a68799fa152e6f8f7647aac7957");
        let got = ladder(&scalar, &u).unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn rfc7748_iterated_ladder() {
        let mut k = [0u8; 32];
        k[0] = 9;
        let mut u = k;
        for i in 1..=1000 {
            let clamped = clamp_scalar(k);
            let next = ladder(&clamped, &u).unwrap();
            k = next;
            u = next;
            if i == 1 {
                assert_eq!(
                    k,
                    hex32("422c8e7a6227d7bca1350b3e2bb7279f7897b87bb6854b783c60e80311ae3079")
                );
            }
        }
        assert_eq!(
            k,
            hex32("de0f73373455be098e4bc36bedc7e2c1de00a0bf385897d1cc16dd54f93ec000")
        );
    }

    #[test]
    fn rfc7748_section_6_1_diffie_hellman_vector() {
        let a_priv = clamp_scalar(hex32(
            "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2a",
        ));
        let b_priv = clamp_scalar(hex32(
            "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb",
        ));
        let mut u9 = [0u8; 32];
        u9[0] = 9;

        let a_pub = ladder(&a_priv, &u9).unwrap();
        let b_pub = ladder(&b_priv, &u9).unwrap();
        assert_eq!(
            a_pub,
            hex32("8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a")
        );
        assert_eq!(
            b_pub,
            hex32("de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f")
        );

        let shared_ab = ladder(&a_priv, &b_pub).unwrap();
        let shared_ba = ladder(&b_priv, &a_pub).unwrap();
        assert_eq!(shared_ab, shared_ba);
        assert_eq!(
            shared_ab,
            hex32("4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742")
        );
    }

    #[test]
    fn clamping_sets_and_clears_expected_bits() {
        let clamped = clamp_scalar([0xffu8; 32]);
        assert_eq!(clamped[0] & 0x07, 0);
        assert_eq!(clamped[31] & 0x80, 0);
        assert_eq!(clamped[31] & 0x40, 0x40);
    }

    #[test]
    fn ladder_rejects_low_order_point() {
        let scalar = clamp_scalar([9u8; 32]);
        let zero_u = [0u8; 32];
        assert!(ladder(&scalar, &zero_u).is_err());
    }

    #[test]
    fn base_u9_single_iteration() {
        let mut u9 = [0u8; 32];
        u9[0] = 9;
        let scalar = clamp_scalar(u9);
        let out = ladder(&scalar, &u9);
        assert!(out.is_ok());
    }
}

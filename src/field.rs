//! Field arithmetic in GF(2^255-19), the finite field underlying both
//! edwards25519 and Curve25519.
//!
//! Field elements are represented as `FieldElement([i64; 10])` in radix
//! 2^25.5 (limbs alternate between 26 and 25 bits). This keeps every
//! limb-by-limb product inside an `i128` accumulator without a bignum
//! crate, and is the same representation ref10-derived implementations
//! (libsodium, curve25519-dalek) use.

use std::ops::{Add, Mul, Neg, Sub};

use subtle::{Choice, ConditionallySelectable};

/// An element of GF(2^255-19), stored as ten `i64` limbs.
///
/// Limbs are not kept canonically reduced between operations; call
/// [`FieldElement::reduce`] before inspecting limbs directly (`to_bytes`
/// and `is_zero` already do this internally).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldElement(pub [i64; 10]);

impl FieldElement {
    /// sqrt(-1) mod p, used to select between the two candidate square
    /// roots during point decompression and field square-root extraction.
    pub const SQRT_M1: Self = Self([
        -32595792, -7943725, 9377950, 3500415, 12389472, -272473, -25146209, -2005654, 326686,
        11406482,
    ]);

    #[inline]
    pub const fn zero() -> Self {
        FieldElement([0; 10])
    }

    #[inline]
    pub const fn one() -> Self {
        let mut fe = [0i64; 10];
        fe[0] = 1;
        FieldElement(fe)
    }

    /// Loads a field element from 32 little-endian bytes.
    ///
    /// The top bit of byte 31 is ignored (callers that care about a
    /// canonical encoding, e.g. point decompression, check it separately).
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let mut h = [0i64; 10];

        h[0] = (bytes[0] as i64)
            | ((bytes[1] as i64) << 8)
            | ((bytes[2] as i64) << 16)
            | (((bytes[3] as i64) & 0x3f) << 24);

        h[1] = (((bytes[3] as i64) >> 6) & 0x03)
            | ((bytes[4] as i64) << 2)
            | ((bytes[5] as i64) << 10)
            | ((bytes[6] as i64) << 18)
            | (((bytes[7] as i64) & 0x01) << 24);

        h[2] = (((bytes[7] as i64) >> 1) & 0x7f)
            | ((bytes[8] as i64) << 7)
            | ((bytes[9] as i64) << 15)
            | (((bytes[10] as i64) & 0x07) << 23);

        h[3] = (((bytes[10] as i64) >> 3) & 0x1f)
            | ((bytes[11] as i64) << 5)
            | ((bytes[12] as i64) << 13)
            | (((bytes[13] as i64) & 0x0f) << 21);

        h[4] = (((bytes[13] as i64) >> 4) & 0x0f)
            | ((bytes[14] as i64) << 4)
            | ((bytes[15] as i64) << 12)
            | (((bytes[16] as i64) & 0x3f) << 20);

        h[5] = (((bytes[16] as i64) >> 6) & 0x03)
            | ((bytes[17] as i64) << 2)
            | ((bytes[18] as i64) << 10)
            | ((bytes[19] as i64) << 18)
            | (((bytes[20] as i64) & 0x01) << 24);

        h[6] = (((bytes[20] as i64) >> 1) & 0x7f)
            | ((bytes[21] as i64) << 7)
            | ((bytes[22] as i64) << 15)
            | (((bytes[23] as i64) & 0x07) << 23);

        h[7] = (((bytes[23] as i64) >> 3) & 0x1f)
            | ((bytes[24] as i64) << 5)
            | ((bytes[25] as i64) << 13)
            | (((bytes[26] as i64) & 0x0f) << 21);

        h[8] = (((bytes[26] as i64) >> 4) & 0x0f)
            | ((bytes[27] as i64) << 4)
            | ((bytes[28] as i64) << 12)
            | (((bytes[29] as i64) & 0x3f) << 20);

        h[9] = (((bytes[29] as i64) >> 6) & 0x03)
            | ((bytes[30] as i64) << 2)
            | ((bytes[31] as i64) << 10);

        FieldElement(h)
    }

    /// Canonical 32-byte little-endian encoding, reduced mod p.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut h = self.reduce().0;

        // Mirrors ref10's fe_tobytes: compute how many times p must be
        // subtracted to land the value strictly below 2^255 - 19, then do it.
        let mut q = (19 * h[9] + (1 << 24)) >> 25;
        q = (h[0] + q) >> 26;
        q = (h[1] + q) >> 25;
        q = (h[2] + q) >> 26;
        q = (h[3] + q) >> 25;
        q = (h[4] + q) >> 26;
        q = (h[5] + q) >> 25;
        q = (h[6] + q) >> 26;
        q = (h[7] + q) >> 25;
        q = (h[8] + q) >> 26;
        q = (h[9] + q) >> 25;

        h[0] += 19 * q;

        let mut carry = h[0] >> 26;
        h[1] += carry;
        h[0] -= carry << 26;
        carry = h[1] >> 25;
        h[2] += carry;
        h[1] -= carry << 25;
        carry = h[2] >> 26;
        h[3] += carry;
        h[2] -= carry << 26;
        carry = h[3] >> 25;
        h[4] += carry;
        h[3] -= carry << 25;
        carry = h[4] >> 26;
        h[5] += carry;
        h[4] -= carry << 26;
        carry = h[5] >> 25;
        h[6] += carry;
        h[5] -= carry << 25;
        carry = h[6] >> 26;
        h[7] += carry;
        h[6] -= carry << 26;
        carry = h[7] >> 25;
        h[8] += carry;
        h[7] -= carry << 25;
        carry = h[8] >> 26;
        h[9] += carry;
        h[8] -= carry << 26;
        carry = h[9] >> 25;
        h[9] -= carry << 25;
        h[0] += carry * 19;

        let mut output = [0u8; 32];
        output[0] = (h[0] & 0xff) as u8;
        output[1] = ((h[0] >> 8) & 0xff) as u8;
        output[2] = ((h[0] >> 16) & 0xff) as u8;
        output[3] = ((h[0] >> 24) & 0x3f) as u8 | ((h[1] << 6) & 0xc0) as u8;
        output[4] = ((h[1] >> 2) & 0xff) as u8;
        output[5] = ((h[1] >> 10) & 0xff) as u8;
        output[6] = ((h[1] >> 18) & 0xff) as u8;
        output[7] = ((h[1] >> 26) & 0x01) as u8 | ((h[2] << 1) & 0xfe) as u8;
        output[8] = ((h[2] >> 7) & 0xff) as u8;
        output[9] = ((h[2] >> 15) & 0xff) as u8;
        output[10] = ((h[2] >> 23) & 0x07) as u8 | ((h[3] << 3) & 0xf8) as u8;
        output[11] = ((h[3] >> 5) & 0xff) as u8;
        output[12] = ((h[3] >> 13) & 0xff) as u8;
        output[13] = ((h[3] >> 21) & 0x0f) as u8 | ((h[4] << 4) & 0xf0) as u8;
        output[14] = ((h[4] >> 4) & 0xff) as u8;
        output[15] = ((h[4] >> 12) & 0xff) as u8;
        output[16] = ((h[4] >> 20) & 0x3f) as u8 | ((h[5] << 6) & 0xc0) as u8;
        output[17] = ((h[5] >> 2) & 0xff) as u8;
        output[18] = ((h[5] >> 10) & 0xff) as u8;
        output[19] = ((h[5] >> 18) & 0xff) as u8;
        output[20] = ((h[5] >> 26) & 0x01) as u8 | ((h[6] << 1) & 0xfe) as u8;
        output[21] = ((h[6] >> 7) & 0xff) as u8;
        output[22] = ((h[6] >> 15) & 0xff) as u8;
        output[23] = ((h[6] >> 23) & 0x07) as u8 | ((h[7] << 3) & 0xf8) as u8;
        output[24] = ((h[7] >> 5) & 0xff) as u8;
        output[25] = ((h[7] >> 13) & 0xff) as u8;
        output[26] = ((h[7] >> 21) & 0x0f) as u8 | ((h[8] << 4) & 0xf0) as u8;
        output[27] = ((h[8] >> 4) & 0xff) as u8;
        output[28] = ((h[8] >> 12) & 0xff) as u8;
        output[29] = ((h[8] >> 20) & 0x3f) as u8 | ((h[9] << 6) & 0xc0) as u8;
        output[30] = ((h[9] >> 2) & 0xff) as u8;
        output[31] = ((h[9] >> 10) & 0xff) as u8;

        output
    }

    /// Propagates carries so every limb lands back in its 25/26-bit range.
    pub fn reduce(&self) -> Self {
        let mut h = self.0;
        let mut carry: i64;

        carry = (h[0] + (1 << 25)) >> 26;
        h[1] += carry;
        h[0] -= carry << 26;
        carry = (h[4] + (1 << 25)) >> 26;
        h[5] += carry;
        h[4] -= carry << 26;
        carry = (h[1] + (1 << 24)) >> 25;
        h[2] += carry;
        h[1] -= carry << 25;
        carry = (h[5] + (1 << 24)) >> 25;
        h[6] += carry;
        h[5] -= carry << 25;
        carry = (h[2] + (1 << 25)) >> 26;
        h[3] += carry;
        h[2] -= carry << 26;
        carry = (h[6] + (1 << 25)) >> 26;
        h[7] += carry;
        h[6] -= carry << 26;
        carry = (h[3] + (1 << 24)) >> 25;
        h[4] += carry;
        h[3] -= carry << 25;
        carry = (h[7] + (1 << 24)) >> 25;
        h[8] += carry;
        h[7] -= carry << 25;
        carry = (h[8] + (1 << 25)) >> 26;
        h[9] += carry;
        h[8] -= carry << 26;

        for _ in 0..3 {
            carry = h[9] >> 25;
            h[0] += carry * 19;
            h[9] -= carry << 25;
            carry = h[0] >> 26;
            h[1] += carry;
            h[0] -= carry << 26;
            carry = h[1] >> 25;
            h[2] += carry;
            h[1] -= carry << 25;
        }

        FieldElement(h)
    }

    #[inline]
    pub fn square(&self) -> Self {
        *self * *self
    }

    #[inline]
    fn pow2k(&self, k: u32) -> Self {
        debug_assert!(k > 0);
        let mut z = self.square().reduce();
        for _ in 1..k {
            z = z.square().reduce();
        }
        z
    }

    /// Returns `(x^((p-5)/8), x^3)`. Both values are consumed by the
    /// square-root/inverse combinators below, following the standard
    /// curve25519 addition chain (31 squarings, 254 total).
    pub fn pow2_252_3(&self) -> (Self, Self) {
        let z2 = self.square().reduce(); // x^2
        let x_cubed = (z2 * *self).reduce(); // x^3
        let z8 = z2.pow2k(2); // x^8
        let z9 = (z8 * *self).reduce(); // x^9
        let z11 = (z9 * z2).reduce(); // x^11
        let z22 = z11.square().reduce(); // x^22
        let z_5_0 = (z22 * z9).reduce(); // x^(2^5-1)
        let z_10_5 = z_5_0.pow2k(5);
        let z_10_0 = (z_10_5 * z_5_0).reduce(); // x^(2^10-1)
        let z_20_10 = z_10_0.pow2k(10);
        let z_20_0 = (z_20_10 * z_10_0).reduce(); // x^(2^20-1)
        let z_40_20 = z_20_0.pow2k(20);
        let z_40_0 = (z_40_20 * z_20_0).reduce(); // x^(2^40-1)
        let z_50_10 = z_40_0.pow2k(10);
        let z_50_0 = (z_50_10 * z_10_0).reduce(); // x^(2^50-1)
        let z_100_50 = z_50_0.pow2k(50);
        let z_100_0 = (z_100_50 * z_50_0).reduce(); // x^(2^100-1)
        let z_200_100 = z_100_0.pow2k(100);
        let z_200_0 = (z_200_100 * z_100_0).reduce(); // x^(2^200-1)
        let z_250_50 = z_200_0.pow2k(50);
        let z_250_0 = (z_250_50 * z_50_0).reduce(); // x^(2^250-1)
        let z_252_2 = z_250_0.pow2k(2);
        let pow_p_5_8 = (z_252_2 * *self).reduce(); // x^(2^252-3)

        (pow_p_5_8, x_cubed)
    }

    fn sqrt_ratio(u: &Self, v: &Self) -> (bool, Self) {
        let v2 = v.square().reduce();
        let v3 = (v2 * *v).reduce();
        let v6 = v3.square().reduce();
        let v7 = (v6 * *v).reduce();

        let u_v3 = (*u * v3).reduce();
        let u_v7 = (*u * v7).reduce();

        let (pow, _) = u_v7.pow2_252_3();
        let mut r = (u_v3 * pow).reduce();

        let vxx = (*v * r.square()).reduce();
        let has_m_root = (vxx - *u).reduce().is_zero();
        let has_p_root = (vxx + *u).reduce().is_zero();
        let u_sqrt_m1 = (*u * Self::SQRT_M1).reduce();
        let has_f_root = (vxx + u_sqrt_m1).reduce().is_zero();

        if has_p_root || has_f_root {
            r = (r * Self::SQRT_M1).reduce();
        }
        if has_p_root {
            r = (-r).reduce();
        }
        if r.is_negative() {
            r = (-r).reduce();
        }

        (has_m_root || has_p_root, r)
    }

    /// True if `self` is a quadratic residue mod p (has a square root).
    pub fn is_square(&self) -> bool {
        let a = self.reduce();
        if a.is_zero() {
            return true;
        }
        Self::sqrt_ratio(&a, &Self::one()).0
    }

    /// Returns `Some(sqrt)` if `self` is a quadratic residue, else `None`.
    pub fn sqrt(&self) -> Option<Self> {
        let a = self.reduce();
        if a.is_zero() {
            return Some(FieldElement::zero());
        }
        let (is_square, root) = Self::sqrt_ratio(&a, &Self::one());
        is_square.then_some(root)
    }

    /// Multiplicative inverse, with the convention `inv(0) = 0`.
    pub fn invert(&self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let (pow_p_5_8, x_cubed) = self.pow2_252_3();
        // p - 2 = 8 * (2^252 - 3) + 3
        (pow_p_5_8.pow2k(3) * x_cubed).reduce()
    }

    /// Selects `a` when `choice` is true, `b` otherwise, branchlessly.
    ///
    /// Thin wrapper over [`ConditionallySelectable`] taking a plain `u8`
    /// at the call sites that drive the constant-time scalar multiply
    /// and the Montgomery ladder.
    #[inline]
    pub fn conditional_select(a: &Self, b: &Self, choice: u8) -> Self {
        let choice = Choice::from(choice);
        let mut result = [0i64; 10];
        for i in 0..10 {
            result[i] = i64::conditional_select(&b.0[i], &a.0[i], choice);
        }
        FieldElement(result)
    }

    /// Swaps `a` and `b` in place when `choice == 1` (branchless).
    pub fn conditional_swap(a: &mut Self, b: &mut Self, choice: u8) {
        let choice = Choice::from(choice);
        for i in 0..10 {
            let mut ai = a.0[i];
            let mut bi = b.0[i];
            i64::conditional_swap(&mut ai, &mut bi, choice);
            a.0[i] = ai;
            b.0[i] = bi;
        }
    }

    pub fn is_zero(&self) -> bool {
        self.reduce().to_bytes().iter().all(|&b| b == 0)
    }

    /// Parity of the canonical encoding's low bit.
    pub fn is_negative(&self) -> bool {
        (self.to_bytes()[0] & 1) == 1
    }
}

impl Add for FieldElement {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let mut h = [0i64; 10];
        for i in 0..10 {
            h[i] = self.0[i] + other.0[i];
        }
        FieldElement(h)
    }
}

impl Sub for FieldElement {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        let mut h = [0i64; 10];
        for i in 0..10 {
            h[i] = self.0[i] - other.0[i];
        }
        FieldElement(h)
    }
}

impl Neg for FieldElement {
    type Output = Self;
    fn neg(self) -> Self {
        FieldElement::zero() - self
    }
}

impl Mul for FieldElement {
    type Output = Self;

    /// Schoolbook multiplication with the high half folded back in via
    /// the `2^255 = 19` reduction, then a two-pass `i128` carry chain.
    fn mul(self, other: Self) -> Self {
        let f = self.0;
        let g = other.0;

        let f: [i128; 10] = std::array::from_fn(|i| f[i] as i128);
        let g: [i128; 10] = std::array::from_fn(|i| g[i] as i128);

        let f1_2 = 2 * f[1];
        let f3_2 = 2 * f[3];
        let f5_2 = 2 * f[5];
        let f7_2 = 2 * f[7];
        let f9_2 = 2 * f[9];

        let g1_19 = 19 * g[1];
        let g2_19 = 19 * g[2];
        let g3_19 = 19 * g[3];
        let g4_19 = 19 * g[4];
        let g5_19 = 19 * g[5];
        let g6_19 = 19 * g[6];
        let g7_19 = 19 * g[7];
        let g8_19 = 19 * g[8];
        let g9_19 = 19 * g[9];

        let mut h = [0i128; 10];

        h[0] = f[0] * g[0]
            + f1_2 * g9_19
            + f[2] * g8_19
            + f3_2 * g7_19
            + f[4] * g6_19
            + f5_2 * g5_19
            + f[6] * g4_19
            + f7_2 * g3_19
            + f[8] * g2_19
            + f9_2 * g1_19;

        h[1] = f[0] * g[1]
            + f[1] * g[0]
            + f[2] * g9_19
            + f[3] * g8_19
            + f[4] * g7_19
            + f[5] * g6_19
            + f[6] * g5_19
            + f[7] * g4_19
            + f[8] * g3_19
            + f[9] * g2_19;

        h[2] = f[0] * g[2]
            + f1_2 * g[1]
            + f[2] * g[0]
            + f3_2 * g9_19
            + f[4] * g8_19
            + f5_2 * g7_19
            + f[6] * g6_19
            + f7_2 * g5_19
            + f[8] * g4_19
            + f9_2 * g3_19;

        h[3] = f[0] * g[3]
            + f[1] * g[2]
            + f[2] * g[1]
            + f[3] * g[0]
            + f[4] * g9_19
            + f[5] * g8_19
            + f[6] * g7_19
            + f[7] * g6_19
            + f[8] * g5_19
            + f[9] * g4_19;

        h[4] = f[0] * g[4]
            + f1_2 * g[3]
            + f[2] * g[2]
            + f3_2 * g[1]
            + f[4] * g[0]
            + f5_2 * g9_19
            + f[6] * g8_19
            + f7_2 * g7_19
            + f[8] * g6_19
            + f9_2 * g5_19;

        h[5] = f[0] * g[5]
            + f[1] * g[4]
            + f[2] * g[3]
            + f[3] * g[2]
            + f[4] * g[1]
            + f[5] * g[0]
            + f[6] * g9_19
            + f[7] * g8_19
            + f[8] * g7_19
            + f[9] * g6_19;

        h[6] = f[0] * g[6]
            + f1_2 * g[5]
            + f[2] * g[4]
            + f3_2 * g[3]
            + f[4] * g[2]
            + f5_2 * g[1]
            + f[6] * g[0]
            + f7_2 * g9_19
            + f[8] * g8_19
            + f9_2 * g7_19;

        h[7] = f[0] * g[7]
            + f[1] * g[6]
            + f[2] * g[5]
            + f[3] * g[4]
            + f[4] * g[3]
            + f[5] * g[2]
            + f[6] * g[1]
            + f[7] * g[0]
            + f[8] * g9_19
            + f[9] * g8_19;

        h[8] = f[0] * g[8]
            + f1_2 * g[7]
            + f[2] * g[6]
            + f3_2 * g[5]
            + f[4] * g[4]
            + f5_2 * g[3]
            + f[6] * g[2]
            + f7_2 * g[1]
            + f[8] * g[0]
            + f9_2 * g9_19;

        h[9] = f[0] * g[9]
            + f[1] * g[8]
            + f[2] * g[7]
            + f[3] * g[6]
            + f[4] * g[5]
            + f[5] * g[4]
            + f[6] * g[3]
            + f[7] * g[2]
            + f[8] * g[1]
            + f[9] * g[0];

        let mut carry: i128;

        carry = (h[0] + (1i128 << 25)) >> 26;
        h[1] += carry;
        h[0] -= carry << 26;
        carry = (h[4] + (1i128 << 25)) >> 26;
        h[5] += carry;
        h[4] -= carry << 26;
        carry = (h[1] + (1i128 << 24)) >> 25;
        h[2] += carry;
        h[1] -= carry << 25;
        carry = (h[5] + (1i128 << 24)) >> 25;
        h[6] += carry;
        h[5] -= carry << 25;
        carry = (h[2] + (1i128 << 25)) >> 26;
        h[3] += carry;
        h[2] -= carry << 26;
        carry = (h[6] + (1i128 << 25)) >> 26;
        h[7] += carry;
        h[6] -= carry << 26;
        carry = (h[3] + (1i128 << 24)) >> 25;
        h[4] += carry;
        h[3] -= carry << 25;
        carry = (h[7] + (1i128 << 24)) >> 25;
        h[8] += carry;
        h[7] -= carry << 25;
        carry = (h[8] + (1i128 << 25)) >> 26;
        h[9] += carry;
        h[8] -= carry << 26;
        carry = (h[9] + (1i128 << 24)) >> 25;
        h[0] += carry * 19;
        h[9] -= carry << 25;

        carry = h[0] >> 26;
        h[1] += carry;
        h[0] -= carry << 26;

        let h_i64: [i64; 10] = std::array::from_fn(|i| h[i] as i64);
        FieldElement(h_i64)
    }
}

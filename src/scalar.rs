//! Arithmetic mod the prime group order
//! `l = 2^252 + 27742317777372353535851937790883648493`.
//!
//! Unlike [`crate::field::FieldElement`] this does not use a radix-51
//! limb layout; scalars are reduced with a plain bit-serial long
//! division against `L`, which keeps the reduction correct by
//! construction and is cheap enough here since nothing on the scalar
//! side sits on a ladder's hot path (that's [`crate::montgomery`]).

use crate::error::{Ed25519Error, Ed25519Result};

/// An integer in `[0, l)`, stored as 32 little-endian bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scalar(pub [u8; 32]);

/// The group order `l`, little-endian.
const L: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
];

const L_LIMBS: [u64; 4] = bytes_to_limbs(&L);

const fn bytes_to_limbs(bytes: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    let mut i = 0;
    while i < 4 {
        let mut limb = 0u64;
        let mut j = 0;
        while j < 8 {
            limb |= (bytes[i * 8 + j] as u64) << (8 * j);
            j += 1;
        }
        limbs[i] = limb;
        i += 1;
    }
    limbs
}

fn limbs_to_bytes(limbs: [u64; 4]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (i, limb) in limbs.iter().enumerate() {
        out[i * 8..i * 8 + 8].copy_from_slice(&limb.to_le_bytes());
    }
    out
}

/// `a < b`, both little-endian 4-limb integers.
fn limbs_lt(a: &[u64; 4], b: &[u64; 4]) -> bool {
    for i in (0..4).rev() {
        if a[i] != b[i] {
            return a[i] < b[i];
        }
    }
    false
}

fn limbs_sub(a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
    let mut out = [0u64; 4];
    let mut borrow = 0i128;
    for i in 0..4 {
        let diff = a[i] as i128 - b[i] as i128 - borrow;
        if diff < 0 {
            out[i] = (diff + (1i128 << 64)) as u64;
            borrow = 1;
        } else {
            out[i] = diff as u64;
            borrow = 0;
        }
    }
    out
}

/// Doubles `r` (mod `l`) and folds in `bit`, assuming `r < l` on entry.
fn shift_in_bit(r: &mut [u64; 4], bit: u64) {
    let mut carry = bit;
    for limb in r.iter_mut() {
        let doubled = (*limb << 1) | carry;
        carry = *limb >> 63;
        *limb = doubled;
    }
    if !limbs_lt(r, &L_LIMBS) {
        *r = limbs_sub(r, &L_LIMBS);
    }
}

/// Reduces an arbitrary-length little-endian byte buffer mod `l`.
///
/// Used both for the 32-byte case (ordinary scalar normalisation) and
/// the 64-byte case (reducing a hash output directly into a scalar, as
/// RFC 8032 signing does for `r` and `k`).
fn reduce_bytes_mod_l(bytes: &[u8]) -> [u64; 4] {
    let mut r = [0u64; 4];
    // MSB-first bit-serial long division.
    for byte_index in (0..bytes.len()).rev() {
        let byte = bytes[byte_index];
        for bit_index in (0..8).rev() {
            let bit = ((byte >> bit_index) & 1) as u64;
            shift_in_bit(&mut r, bit);
        }
    }
    r
}

/// Schoolbook 4x4-limb multiply producing an 8-limb (512-bit) product.
fn limbs_mul_wide(a: &[u64; 4], b: &[u64; 4]) -> [u64; 8] {
    let mut acc = [0u128; 8];
    for i in 0..4 {
        for j in 0..4 {
            acc[i + j] += a[i] as u128 * b[j] as u128;
        }
    }
    let mut out = [0u64; 8];
    let mut carry = 0u128;
    for i in 0..8 {
        let total = acc[i] + carry;
        out[i] = total as u64;
        carry = total >> 64;
    }
    out
}

fn wide_limbs_to_bytes(limbs: [u64; 8]) -> [u8; 64] {
    let mut out = [0u8; 64];
    for (i, limb) in limbs.iter().enumerate() {
        out[i * 8..i * 8 + 8].copy_from_slice(&limb.to_le_bytes());
    }
    out
}

impl Scalar {
    pub const ZERO: Self = Scalar([0u8; 32]);
    pub const ONE: Self = {
        let mut bytes = [0u8; 32];
        bytes[0] = 1;
        Scalar(bytes)
    };

    /// The group order `l` itself, for use as the upper bound passed to
    /// [`Scalar::normalize`]. Not a valid scalar value on its own (it is
    /// not `< l`), so this is only ever used as a comparison bound.
    #[must_use]
    pub fn modulus() -> Self {
        Scalar(L)
    }

    /// Reduces a 32-byte little-endian buffer mod `l`. Always succeeds.
    #[must_use]
    pub fn from_bytes_mod_order(bytes: &[u8; 32]) -> Self {
        Scalar(limbs_to_bytes(reduce_bytes_mod_l(bytes)))
    }

    /// Reduces a 64-byte little-endian buffer mod `l` (a SHA-512 digest,
    /// per RFC 8032 steps for `r` and the challenge `k`).
    #[must_use]
    pub fn from_bytes_mod_order_wide(bytes: &[u8; 64]) -> Self {
        Scalar(limbs_to_bytes(reduce_bytes_mod_l(bytes)))
    }

    /// Accepts only a canonical encoding (`bytes < l`).
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::InvalidScalar`] if `bytes` encodes a value
    /// `>= l`.
    pub fn from_canonical_bytes(bytes: [u8; 32]) -> Ed25519Result<Self> {
        let limbs = bytes_to_limbs(&bytes);
        if limbs_lt(&limbs, &L_LIMBS) {
            Ok(Scalar(bytes))
        } else {
            Err(Ed25519Error::InvalidScalar)
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Bit `i` (0 = least significant) of the canonical encoding.
    #[must_use]
    pub fn bit(&self, i: usize) -> u8 {
        (self.0[i / 8] >> (i % 8)) & 1
    }

    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let a = bytes_to_limbs(&self.0);
        let b = bytes_to_limbs(&other.0);
        let mut sum = [0u64; 4];
        let mut carry = 0u128;
        for i in 0..4 {
            let total = a[i] as u128 + b[i] as u128 + carry;
            sum[i] = total as u64;
            carry = total >> 64;
        }
        if !limbs_lt(&sum, &L_LIMBS) {
            sum = limbs_sub(&sum, &L_LIMBS);
        }
        Scalar(limbs_to_bytes(sum))
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        if self.is_zero() {
            return *self;
        }
        let a = bytes_to_limbs(&self.0);
        Scalar(limbs_to_bytes(limbs_sub(&L_LIMBS, &a)))
    }

    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let a = bytes_to_limbs(&self.0);
        let b = bytes_to_limbs(&other.0);
        let product = limbs_mul_wide(&a, &b);
        let bytes = wide_limbs_to_bytes(product);
        Scalar(limbs_to_bytes(reduce_bytes_mod_l(&bytes)))
    }

    /// Checks `0 < n < max` (`strict`) or `0 <= n < max`, used to gate
    /// scalar-multiplication inputs before they reach the curve layer.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::InvalidScalar`] when the bound is violated.
    pub fn normalize(&self, max: &Self, strict: bool) -> Ed25519Result<Self> {
        let self_limbs = bytes_to_limbs(&self.0);
        let max_limbs = bytes_to_limbs(&max.0);
        if !limbs_lt(&self_limbs, &max_limbs) {
            return Err(Ed25519Error::InvalidScalar);
        }
        if strict && self.is_zero() {
            return Err(Ed25519Error::InvalidScalar);
        }
        Ok(*self)
    }
}

impl std::ops::Add for Scalar {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Scalar::add(&self, &rhs)
    }
}

impl std::ops::Mul for Scalar {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Scalar::mul(&self, &rhs)
    }
}

impl std::ops::Neg for Scalar {
    type Output = Self;
    fn neg(self) -> Self {
        Scalar::neg(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_one_are_canonical() {
        assert!(Scalar::from_canonical_bytes(Scalar::ZERO.0).is_ok());
        assert!(Scalar::from_canonical_bytes(Scalar::ONE.0).is_ok());
    }

    #[test]
    fn l_itself_is_not_canonical() {
        assert!(Scalar::from_canonical_bytes(L).is_err());
    }

    #[test]
    fn add_wraps_mod_l() {
        let l_minus_one = Scalar::from_canonical_bytes({
            let mut bytes = L;
            bytes[0] -= 1;
            bytes
        })
        .unwrap();
        let sum = l_minus_one.add(&Scalar::ONE);
        assert_eq!(sum, Scalar::ZERO);
    }

    #[test]
    fn neg_is_additive_inverse() {
        let five = Scalar::from_bytes_mod_order(&{
            let mut b = [0u8; 32];
            b[0] = 5;
            b
        });
        assert_eq!(five.add(&five.neg()), Scalar::ZERO);
    }

    #[test]
    fn mul_distributes_over_add() {
        let a = Scalar::from_bytes_mod_order(&{
            let mut b = [0u8; 32];
            b[0] = 7;
            b
        });
        let x = Scalar::from_bytes_mod_order(&{
            let mut b = [0u8; 32];
            b[0] = 3;
            b
        });
        let y = Scalar::from_bytes_mod_order(&{
            let mut b = [0u8; 32];
            b[0] = 11;
            b
        });
        assert_eq!(a.mul(&x.add(&y)), a.mul(&x).add(&a.mul(&y)));
    }

    #[test]
    fn wide_reduction_matches_narrow_for_small_values() {
        let mut wide = [0u8; 64];
        wide[0] = 42;
        let mut narrow = [0u8; 32];
        narrow[0] = 42;
        assert_eq!(
            Scalar::from_bytes_mod_order_wide(&wide),
            Scalar::from_bytes_mod_order(&narrow)
        );
    }

    #[test]
    fn bit_extraction_matches_byte_layout() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0b0000_0101;
        let s = Scalar(bytes);
        assert_eq!(s.bit(0), 1);
        assert_eq!(s.bit(1), 0);
        assert_eq!(s.bit(2), 1);
    }
}

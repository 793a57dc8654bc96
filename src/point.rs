//! Points on the twisted Edwards curve `-x^2 + y^2 = 1 + d*x^2*y^2`
//! (`a = -1`) underlying Ed25519, in both affine and extended
//! projective form.

use crate::error::{Ed25519Error, Ed25519Result};
use crate::field::FieldElement;
use crate::scalar::Scalar;

fn small(v: i64) -> FieldElement {
    let mut limbs = [0i64; 10];
    limbs[0] = v;
    FieldElement(limbs).reduce()
}

/// `d = -121665/121666 mod p`, the curve's non-square parameter.
fn curve_d() -> FieldElement {
    let num = -small(121665);
    let den = small(121666);
    (num * den.invert()).reduce()
}

/// The canonical compressed encoding of the conventional base point `G`
/// (`y = 4/5 mod p`, `x` even). Decompressing this, rather than hand-typing
/// `x`, doubles as a self-check that decompression agrees with encoding.
const BASEPOINT_COMPRESSED: [u8; 32] = [
    0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
];

/// A point in affine `(x, y)` coordinates.
#[derive(Clone, Copy, Debug)]
pub struct AffinePoint {
    pub x: FieldElement,
    pub y: FieldElement,
}

impl AffinePoint {
    #[must_use]
    pub fn neutral() -> Self {
        AffinePoint {
            x: FieldElement::zero(),
            y: FieldElement::one(),
        }
    }

    #[must_use]
    pub fn base_point() -> Self {
        Self::decompress(&BASEPOINT_COMPRESSED).expect("basepoint constant decompresses")
    }

    #[must_use]
    pub fn eq(&self, other: &Self) -> bool {
        self.x.reduce().to_bytes() == other.x.reduce().to_bytes()
            && self.y.reduce().to_bytes() == other.y.reduce().to_bytes()
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        AffinePoint {
            x: -self.x,
            y: self.y,
        }
    }

    /// Encodes `y` as 32 little-endian bytes with `x`'s parity folded
    /// into the otherwise-unused high bit of the last byte.
    #[must_use]
    pub fn compress(&self) -> [u8; 32] {
        let mut bytes = self.y.to_bytes();
        if self.x.is_negative() {
            bytes[31] |= 0x80;
        }
        bytes
    }

    /// Recovers a point from its compressed encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::InvalidPoint`] if the encoded `y` is not
    /// canonically reduced, or if no `x` satisfies the curve equation
    /// for that `y`.
    pub fn decompress(bytes: &[u8; 32]) -> Ed25519Result<Self> {
        let sign = (bytes[31] >> 7) & 1;
        let mut y_bytes = *bytes;
        y_bytes[31] &= 0x7f;

        // Reject non-canonical y >= p up front; from_bytes alone would
        // silently accept it since it only keeps the low 255 bits.
        if !is_canonical_field_bytes(&y_bytes) {
            return Err(Ed25519Error::InvalidPoint);
        }

        let y = FieldElement::from_bytes(&y_bytes);
        let y2 = y.square().reduce();
        let u = (y2 - FieldElement::one()).reduce();
        let v = (curve_d() * y2 + FieldElement::one()).reduce();

        let v3 = (v * v.square()).reduce();
        let v7 = (v3 * v.square().square()).reduce();
        let (pow, _) = (u * v7).reduce().pow2_252_3();
        let mut x = (u * v3 * pow).reduce();

        let vx2 = (v * x.square()).reduce();
        if vx2.reduce().to_bytes() == u.reduce().to_bytes() {
            // candidate is exact
        } else if (vx2 + u).reduce().is_zero() {
            x = (x * FieldElement::SQRT_M1).reduce();
        } else {
            return Err(Ed25519Error::InvalidPoint);
        }

        if x.is_zero() && sign == 1 {
            return Err(Ed25519Error::InvalidPoint);
        }
        if x.is_negative() != (sign == 1) {
            x = (-x).reduce();
        }

        Ok(AffinePoint { x, y })
    }

    #[must_use]
    pub fn to_extended(&self) -> ExtendedPoint {
        ExtendedPoint::from_affine(self)
    }
}

fn is_canonical_field_bytes(bytes: &[u8; 32]) -> bool {
    // p = 2^255 - 19; canonical means bytes, read little-endian, are < p.
    const P: [u8; 32] = [
        0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0x7f,
    ];
    for i in (0..32).rev() {
        if bytes[i] != P[i] {
            return bytes[i] < P[i];
        }
    }
    false // equal to p: not canonical
}

/// A point in extended twisted-Edwards coordinates `(X, Y, Z, T)` with
/// `T = X*Y/Z`. Addition and doubling here never need an inversion.
#[derive(Clone, Copy, Debug)]
pub struct ExtendedPoint {
    pub x: FieldElement,
    pub y: FieldElement,
    pub z: FieldElement,
    pub t: FieldElement,
}

impl ExtendedPoint {
    #[must_use]
    pub fn neutral() -> Self {
        ExtendedPoint {
            x: FieldElement::zero(),
            y: FieldElement::one(),
            z: FieldElement::one(),
            t: FieldElement::zero(),
        }
    }

    #[must_use]
    pub fn base_point() -> Self {
        AffinePoint::base_point().to_extended()
    }

    #[must_use]
    pub fn from_affine(p: &AffinePoint) -> Self {
        ExtendedPoint {
            x: p.x,
            y: p.y,
            z: FieldElement::one(),
            t: (p.x * p.y).reduce(),
        }
    }

    /// Projects back to affine form.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::InvalidPoint`] if `z` is zero (it never
    /// should be for a point built through this module's operations).
    pub fn to_affine(&self) -> Ed25519Result<AffinePoint> {
        if self.z.is_zero() {
            return Err(Ed25519Error::InvalidPoint);
        }
        let z_inv = self.z.invert();
        Ok(AffinePoint {
            x: (self.x * z_inv).reduce(),
            y: (self.y * z_inv).reduce(),
        })
    }

    #[must_use]
    pub fn neg(&self) -> Self {
        ExtendedPoint {
            x: -self.x,
            y: self.y,
            z: self.z,
            t: -self.t,
        }
    }

    #[must_use]
    pub fn eq(&self, other: &Self) -> bool {
        let lhs = (self.x * other.z).reduce().to_bytes();
        let rhs = (other.x * self.z).reduce().to_bytes();
        let lhs2 = (self.y * other.z).reduce().to_bytes();
        let rhs2 = (other.y * self.z).reduce().to_bytes();
        lhs == rhs && lhs2 == rhs2
    }

    /// Unified addition for twisted Edwards curves with `a = -1`.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        let a = ((self.y - self.x) * (other.y + other.x)).reduce();
        let b = ((self.y + self.x) * (other.y - other.x)).reduce();
        let f = (b - a).reduce();
        if f.is_zero() {
            return self.double();
        }
        let c = (self.z * other.t + self.z * other.t).reduce();
        let d = (self.t * other.z + self.t * other.z).reduce();
        let e = (d + c).reduce();
        let g = (b + a).reduce();
        let h = (d - c).reduce();
        ExtendedPoint {
            x: (e * f).reduce(),
            y: (g * h).reduce(),
            z: (f * g).reduce(),
            t: (e * h).reduce(),
        }
    }

    #[must_use]
    pub fn double(&self) -> Self {
        let a = self.x.square().reduce();
        let b = self.y.square().reduce();
        let c = (self.z.square() + self.z.square()).reduce();
        let d = -a;
        let xy = (self.x + self.y).reduce();
        let e = (xy.square() - a - b).reduce();
        let g = (d + b).reduce();
        let f = (g - c).reduce();
        let h = (d - b).reduce();
        ExtendedPoint {
            x: (e * f).reduce(),
            y: (g * h).reduce(),
            z: (f * g).reduce(),
            t: (e * h).reduce(),
        }
    }

    #[must_use]
    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    /// Variable-time right-to-left double-and-add. Suitable for public
    /// scalars (verification's `k`, `s`, and the public point `A`).
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::InvalidScalar`] if `n` is not `< l`.
    pub fn mul(&self, n: &Scalar) -> Ed25519Result<Self> {
        let n = n.normalize(&Scalar::modulus(), false)?;
        let mut acc = ExtendedPoint::neutral();
        let mut addend = *self;
        for i in 0..256 {
            if n.bit(i) == 1 {
                acc = acc.add(&addend);
            }
            addend = addend.double();
        }
        Ok(acc)
    }

    /// Constant-time double-and-always-add: every iteration performs an
    /// add whether or not the bit is set, selecting the result with a
    /// branchless conditional move. Used wherever the scalar is secret
    /// (signing's nonce and secret-key derivation).
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::InvalidScalar`] if `n` is not `< l`.
    pub fn mul_constant_time(&self, n: &Scalar) -> Ed25519Result<Self> {
        let n = n.normalize(&Scalar::modulus(), false)?;
        let mut acc = ExtendedPoint::neutral();
        let mut addend = *self;
        for i in 0..256 {
            let bit = n.bit(i);
            let candidate = acc.add(&addend);
            acc = ExtendedPoint {
                x: FieldElement::conditional_select(&candidate.x, &acc.x, bit),
                y: FieldElement::conditional_select(&candidate.y, &acc.y, bit),
                z: FieldElement::conditional_select(&candidate.z, &acc.z, bit),
                t: FieldElement::conditional_select(&candidate.t, &acc.t, bit),
            };
            addend = addend.double();
        }
        Ok(acc)
    }
}

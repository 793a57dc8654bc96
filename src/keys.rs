//! Key and signature value types.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec::{self, Encoding};
use crate::error::{Ed25519Error, Ed25519Result};
use crate::point::AffinePoint;
use crate::scalar::Scalar;

/// A 32-byte Ed25519 private key seed.
///
/// Not `Copy`: key material duplicating itself should be a visible
/// `.clone()` in the code, not something that happens for free.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(pub(crate) [u8; 32]);

impl PrivateKey {
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        PrivateKey(bytes)
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Encodes the seed as text in `encoding`.
    #[must_use]
    pub fn encode(&self, encoding: Encoding) -> String {
        codec::encode(&self.0, encoding)
    }

    /// Decodes a seed previously produced by [`PrivateKey::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::DecodeError`] if `text` is not valid for
    /// `encoding` or does not decode to 32 bytes.
    pub fn decode(text: &str, encoding: Encoding) -> Ed25519Result<Self> {
        let bytes = codec::decode(text, encoding, 32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(PrivateKey(out))
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// A 32-byte compressed Ed25519 public key.
#[derive(Clone, Copy, Debug)]
pub struct PublicKey(pub(crate) AffinePoint);

impl PublicKey {
    #[must_use]
    pub fn from_point(point: AffinePoint) -> Self {
        PublicKey(point)
    }

    /// Decodes a compressed public key.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::InvalidPoint`] if the bytes do not decode
    /// to a point on the curve.
    pub fn from_bytes(bytes: &[u8; 32]) -> Ed25519Result<Self> {
        Ok(PublicKey(AffinePoint::decompress(bytes)?))
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.compress()
    }

    #[must_use]
    pub fn point(&self) -> &AffinePoint {
        &self.0
    }

    /// Encodes the compressed point as text in `encoding`.
    #[must_use]
    pub fn encode(&self, encoding: Encoding) -> String {
        codec::encode(&self.to_bytes(), encoding)
    }

    /// Decodes a public key previously produced by [`PublicKey::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::DecodeError`] on a malformed encoding, or
    /// [`Ed25519Error::InvalidPoint`] if the decoded bytes are not a
    /// valid compressed point.
    pub fn decode(text: &str, encoding: Encoding) -> Ed25519Result<Self> {
        let bytes = codec::decode(text, encoding, 32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        PublicKey::from_bytes(&out)
    }
}

/// An `(R, s)` Ed25519 signature, serialised as `compress(R) || s`.
#[derive(Clone, Copy, Debug)]
pub struct Signature {
    pub r: AffinePoint,
    pub s: Scalar,
}

impl Signature {
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[0..32].copy_from_slice(&self.r.compress());
        out[32..64].copy_from_slice(&self.s.to_bytes());
        out
    }

    /// Parses a 64-byte signature.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::InvalidSignature`] if the buffer has the
    /// wrong length or `R` does not decompress to a curve point.
    pub fn from_bytes(bytes: &[u8]) -> Ed25519Result<Self> {
        if bytes.len() != 64 {
            return Err(Ed25519Error::InvalidSignature);
        }
        let mut r_bytes = [0u8; 32];
        r_bytes.copy_from_slice(&bytes[0..32]);
        let mut s_bytes = [0u8; 32];
        s_bytes.copy_from_slice(&bytes[32..64]);

        let r = AffinePoint::decompress(&r_bytes).map_err(|_| Ed25519Error::InvalidSignature)?;
        let s = Scalar::from_canonical_bytes(s_bytes).map_err(|_| Ed25519Error::InvalidSignature)?;
        Ok(Signature { r, s })
    }

    /// Encodes `compress(R) || s` as text in `encoding`.
    #[must_use]
    pub fn encode(&self, encoding: Encoding) -> String {
        codec::encode(&self.to_bytes(), encoding)
    }

    /// Decodes a signature previously produced by [`Signature::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::DecodeError`] if `text` is not valid for
    /// `encoding`, or [`Ed25519Error::InvalidSignature`] if the decoded
    /// bytes do not parse as a signature.
    pub fn decode(text: &str, encoding: Encoding) -> Ed25519Result<Self> {
        let bytes = codec::decode(text, encoding, 64)?;
        Signature::from_bytes(&bytes)
    }
}

/// A private key supplied either as a parsed value or as text in one of
/// the [`Encoding`] variants, dispatched once at the call site rather
/// than duck-typed inside each operation.
pub enum KeyInput<'a> {
    Structured(&'a PrivateKey),
    Encoded(&'a str, Encoding),
}

impl KeyInput<'_> {
    /// Resolves to an owned [`PrivateKey`], decoding if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::DecodeError`] if the encoded form is
    /// invalid for its declared encoding or the wrong length.
    pub fn resolve(&self) -> Ed25519Result<PrivateKey> {
        match self {
            KeyInput::Structured(key) => Ok((**key).clone()),
            KeyInput::Encoded(text, encoding) => {
                let bytes = codec::decode(text, *encoding, 32)?;
                let mut out = [0u8; 32];
                out.copy_from_slice(&bytes);
                Ok(PrivateKey::from_bytes(out))
            }
        }
    }
}

impl<'a> From<&'a PrivateKey> for KeyInput<'a> {
    fn from(key: &'a PrivateKey) -> Self {
        KeyInput::Structured(key)
    }
}

/// A public key supplied either as a parsed value or as encoded text.
/// See [`KeyInput`] for the dispatch rationale.
pub enum PointInput<'a> {
    Structured(&'a PublicKey),
    Encoded(&'a str, Encoding),
}

impl PointInput<'_> {
    /// Resolves to an owned [`PublicKey`], decoding and decompressing if
    /// necessary.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::DecodeError`] on a malformed encoding, or
    /// [`Ed25519Error::InvalidPoint`] if the bytes are not a valid point.
    pub fn resolve(&self) -> Ed25519Result<PublicKey> {
        match self {
            PointInput::Structured(key) => Ok(**key),
            PointInput::Encoded(text, encoding) => {
                let bytes = codec::decode(text, *encoding, 32)?;
                let mut out = [0u8; 32];
                out.copy_from_slice(&bytes);
                PublicKey::from_bytes(&out)
            }
        }
    }
}

impl<'a> From<&'a PublicKey> for PointInput<'a> {
    fn from(key: &'a PublicKey) -> Self {
        PointInput::Structured(key)
    }
}

/// A signature supplied either as a parsed value or as encoded text.
/// See [`KeyInput`] for the dispatch rationale.
pub enum SignatureInput<'a> {
    Structured(&'a Signature),
    Encoded(&'a str, Encoding),
}

impl SignatureInput<'_> {
    /// Resolves to an owned [`Signature`], decoding if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::DecodeError`] on a malformed encoding, or
    /// [`Ed25519Error::InvalidSignature`] if the bytes do not parse.
    pub fn resolve(&self) -> Ed25519Result<Signature> {
        match self {
            SignatureInput::Structured(sig) => Ok(**sig),
            SignatureInput::Encoded(text, encoding) => {
                let bytes = codec::decode(text, *encoding, 64)?;
                Signature::from_bytes(&bytes)
            }
        }
    }
}

impl<'a> From<&'a Signature> for SignatureInput<'a> {
    fn from(sig: &'a Signature) -> Self {
        SignatureInput::Structured(sig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_key_debug_does_not_leak_bytes() {
        let sk = PrivateKey::from_bytes([0x42; 32]);
        assert_eq!(format!("{sk:?}"), "PrivateKey(..)");
    }

    #[test]
    fn signature_rejects_wrong_length() {
        assert_eq!(
            Signature::from_bytes(&[0u8; 63]).unwrap_err(),
            Ed25519Error::InvalidSignature
        );
    }

    #[test]
    fn signature_rejects_non_canonical_s() {
        let mut bytes = [0u8; 64];
        bytes[0..32].copy_from_slice(&AffinePoint::base_point().compress());
        bytes[32..64].copy_from_slice(&Scalar::modulus().to_bytes());
        assert_eq!(
            Signature::from_bytes(&bytes).unwrap_err(),
            Ed25519Error::InvalidSignature
        );
    }

    /// `decode_e(encode_e(X)) = X` for every serialisable type across
    /// every text encoding. `Raw` is excluded: `codec::decode` has no
    /// text form for it (encoding to `Raw` yields an empty string), so
    /// round-tripping through text is only meaningful for the other
    /// three.
    #[test]
    fn encode_decode_round_trips_for_all_serialisable_types() {
        let sk = PrivateKey::from_bytes([0x11; 32]);
        let pk = PublicKey::from_point(AffinePoint::base_point());
        let sig = Signature {
            r: AffinePoint::base_point(),
            s: Scalar::ONE,
        };

        for encoding in [Encoding::Base16, Encoding::Hex, Encoding::Base64] {
            let sk_text = sk.encode(encoding);
            assert_eq!(PrivateKey::decode(&sk_text, encoding).unwrap().0, sk.0);

            let pk_text = pk.encode(encoding);
            assert_eq!(
                PublicKey::decode(&pk_text, encoding).unwrap().to_bytes(),
                pk.to_bytes()
            );

            let sig_text = sig.encode(encoding);
            assert_eq!(
                Signature::decode(&sig_text, encoding).unwrap().to_bytes(),
                sig.to_bytes()
            );
        }
    }

    #[test]
    fn key_input_dispatch_resolves_structured_and_encoded() {
        let sk = PrivateKey::from_bytes([0x22; 32]);
        let structured = KeyInput::from(&sk).resolve().unwrap();
        assert_eq!(structured.0, sk.0);

        let text = sk.encode(Encoding::Hex);
        let encoded = KeyInput::Encoded(&text, Encoding::Hex).resolve().unwrap();
        assert_eq!(encoded.0, sk.0);
    }
}

//! Key generation, signing and verification (RFC 8032), plus the X25519
//! shared-secret derivation built from an Ed25519 keypair.

use rand_core::{CryptoRng, RngCore};

use crate::codec::{self, Encoding};
use crate::debug;
use crate::error::{Ed25519Error, Ed25519Result};
use crate::hash::{Hasher512, Sha512Hasher};
use crate::keys::{KeyInput, PointInput, PrivateKey, PublicKey, Signature, SignatureInput};
use crate::montgomery;
use crate::point::{AffinePoint, ExtendedPoint};
use crate::scalar::Scalar;

/// An expanded private key: the clamped signing scalar, the nonce
/// prefix, and the derived public point. Held only transiently inside
/// sign/derive, never returned to callers.
struct ExpandedKey {
    scalar: Scalar,
    prefix: [u8; 32],
    public: AffinePoint,
}

fn expand<H: Hasher512>(hasher: &H, sk: &PrivateKey) -> ExpandedKey {
    let digest = hasher.hash(&sk.to_bytes());
    let mut head = [0u8; 32];
    head.copy_from_slice(&digest[0..32]);
    let mut prefix = [0u8; 32];
    prefix.copy_from_slice(&digest[32..64]);

    let clamped = montgomery::clamp_scalar(head);
    let scalar = Scalar::from_bytes_mod_order(&clamped);
    let public = ExtendedPoint::base_point()
        .mul_constant_time(&scalar)
        .expect("clamped scalar is always canonical")
        .to_affine()
        .expect("base point is never at infinity");

    debug::log(|| format!("expanded public key: {:02x?}", public.compress()));

    ExpandedKey {
        scalar,
        prefix,
        public,
    }
}

/// EdDSA operating context, generic over the 64-byte hash binding.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdDsa<H> {
    hasher: H,
}

/// The conventional instantiation: Ed25519 with SHA-512.
pub type StandardEdDsa = EdDsa<Sha512Hasher>;

impl<H: Hasher512> EdDsa<H> {
    #[must_use]
    pub fn new(hasher: H) -> Self {
        EdDsa { hasher }
    }

    /// Draws a fresh 32-byte private key from `rng`.
    pub fn generate_key<R: RngCore + CryptoRng>(&self, rng: &mut R) -> PrivateKey {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        PrivateKey::from_bytes(bytes)
    }

    /// Draws a fresh private key from the operating system's CSPRNG.
    #[must_use]
    pub fn generate_key_os(&self) -> PrivateKey {
        self.generate_key(&mut rand_core::TryRngCore::unwrap_err(rand::rngs::OsRng))
    }

    /// Derives the public key belonging to `sk`.
    #[must_use]
    pub fn get_pubkey(&self, sk: &PrivateKey) -> PublicKey {
        PublicKey::from_point(expand(&self.hasher, sk).public)
    }

    /// Signs `message` with `sk`, per RFC 8032.
    #[must_use]
    pub fn sign(&self, message: &[u8], sk: &PrivateKey) -> Signature {
        let expanded = expand(&self.hasher, sk);

        let mut nonce_input = Vec::with_capacity(32 + message.len());
        nonce_input.extend_from_slice(&expanded.prefix);
        nonce_input.extend_from_slice(message);
        let r_scalar = Scalar::from_bytes_mod_order_wide(&self.hasher.hash(&nonce_input));

        let r_point = ExtendedPoint::base_point()
            .mul_constant_time(&r_scalar)
            .expect("reduced scalar is always canonical")
            .to_affine()
            .expect("base point is never at infinity");

        let compressed_r = r_point.compress();
        let compressed_a = expanded.public.compress();

        let mut challenge_input = Vec::with_capacity(64 + message.len());
        challenge_input.extend_from_slice(&compressed_r);
        challenge_input.extend_from_slice(&compressed_a);
        challenge_input.extend_from_slice(message);
        let k = Scalar::from_bytes_mod_order_wide(&self.hasher.hash(&challenge_input));

        let s = r_scalar.add(&k.mul(&expanded.scalar));

        debug::log(|| format!("signed with challenge {:02x?}", k.to_bytes()));

        Signature { r: r_point, s }
    }

    /// Verifies `sig` over `message` against `pk`.
    ///
    /// Returns `Ok(true)`/`Ok(false)` for a well-formed signature that
    /// verifies or not; never returns `Ok(false)` for malformed input,
    /// only `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::InvalidSignature`] if `sig` is malformed.
    pub fn verify(&self, sig: &Signature, message: &[u8], pk: &PublicKey) -> Ed25519Result<bool> {
        let compressed_r = sig.r.compress();
        let compressed_a = pk.to_bytes();

        let mut challenge_input = Vec::with_capacity(64 + message.len());
        challenge_input.extend_from_slice(&compressed_r);
        challenge_input.extend_from_slice(&compressed_a);
        challenge_input.extend_from_slice(message);
        let k = Scalar::from_bytes_mod_order_wide(&self.hasher.hash(&challenge_input));

        let r = sig.r.to_extended();
        let a = pk.point().to_extended();

        let k_a = a.mul(&k)?;
        let s_g = ExtendedPoint::base_point().mul(&sig.s)?;
        let combined = r.add(&k_a).sub(&s_g);

        // Cofactor multiplication: double three times rather than a
        // generic scalar-mul by 8, since the accumulator is already in
        // hand and a fixed triple-double is cheaper and branch-free.
        let cleared = combined.double().double().double();

        Ok(cleared.eq(&ExtendedPoint::neutral()))
    }

    /// Verifies a raw signature/message/public-key byte triple, surfacing
    /// decode failures distinctly from a mathematically failed check.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::InvalidSignature`] or
    /// [`Ed25519Error::InvalidPoint`] if `sig_bytes` or `pk_bytes` do not
    /// parse.
    pub fn verify_bytes(
        &self,
        sig_bytes: &[u8],
        message: &[u8],
        pk_bytes: &[u8; 32],
    ) -> Ed25519Result<bool> {
        let sig = Signature::from_bytes(sig_bytes)?;
        let pk = PublicKey::from_bytes(pk_bytes)?;
        self.verify(&sig, message, &pk)
    }

    /// Computes the X25519 shared secret between `sk` and a peer's
    /// Ed25519 public key.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::InvalidKey`] if the peer's point maps to
    /// a low-order Montgomery `u`-coordinate.
    pub fn get_shared_secret(
        &self,
        sk: &PrivateKey,
        peer: &PublicKey,
    ) -> Ed25519Result<[u8; 32]> {
        let digest = self.hasher.hash(&sk.to_bytes());
        let mut head = [0u8; 32];
        head.copy_from_slice(&digest[0..32]);
        let clamped = montgomery::clamp_scalar(head);

        let u = montgomery::edwards_y_to_montgomery_u(&peer.point().y);
        montgomery::ladder(&clamped, &u.to_bytes())
    }

    /// Curve parameters, for callers that want to inspect them directly.
    #[must_use]
    pub fn params(&self) -> Params {
        Params::default()
    }

    /// Draws a fresh private key and encodes it as text in `encoding`.
    #[must_use]
    pub fn generate_key_encoded<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        encoding: Encoding,
    ) -> String {
        self.generate_key(rng).encode(encoding)
    }

    /// [`EdDsa::get_pubkey`], accepting either a structured or encoded
    /// private key and returning the public key encoded as text.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::DecodeError`] if `sk` is an invalid
    /// encoding.
    pub fn get_pubkey_encoded(
        &self,
        sk: KeyInput<'_>,
        encoding: Encoding,
    ) -> Ed25519Result<String> {
        let sk = sk.resolve()?;
        Ok(self.get_pubkey(&sk).encode(encoding))
    }

    /// [`EdDsa::sign`], accepting either a structured or encoded private
    /// key and returning the signature encoded as text.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::DecodeError`] if `sk` is an invalid
    /// encoding.
    pub fn sign_encoded(
        &self,
        message: &[u8],
        sk: KeyInput<'_>,
        encoding: Encoding,
    ) -> Ed25519Result<String> {
        let sk = sk.resolve()?;
        Ok(self.sign(message, &sk).encode(encoding))
    }

    /// [`EdDsa::verify`], accepting either structured or encoded forms
    /// of the signature and public key.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::DecodeError`] if `sig` or `pk` is an
    /// invalid encoding, or [`Ed25519Error::InvalidSignature`] if `sig`
    /// does not parse.
    pub fn verify_encoded(
        &self,
        sig: SignatureInput<'_>,
        message: &[u8],
        pk: PointInput<'_>,
    ) -> Ed25519Result<bool> {
        let sig = sig.resolve()?;
        let pk = pk.resolve()?;
        self.verify(&sig, message, &pk)
    }

    /// [`EdDsa::get_shared_secret`], accepting either structured or
    /// encoded forms of the private and peer public key, and returning
    /// the shared secret encoded as text.
    ///
    /// # Errors
    ///
    /// Returns [`Ed25519Error::DecodeError`] if `sk` or `peer` is an
    /// invalid encoding, or [`Ed25519Error::InvalidKey`] per
    /// [`EdDsa::get_shared_secret`].
    pub fn get_shared_secret_encoded(
        &self,
        sk: KeyInput<'_>,
        peer: PointInput<'_>,
        encoding: Encoding,
    ) -> Ed25519Result<String> {
        let sk = sk.resolve()?;
        let peer = peer.resolve()?;
        let shared = self.get_shared_secret(&sk, &peer)?;
        Ok(codec::encode(&shared, encoding))
    }
}

/// Compile-time curve constants, exposed read-only.
#[derive(Clone, Copy, Debug, Default)]
pub struct Params {
    _private: (),
}

impl Params {
    #[must_use]
    pub fn base_point(&self) -> AffinePoint {
        AffinePoint::base_point()
    }

    #[must_use]
    pub fn cofactor(&self) -> u8 {
        8
    }
}

/// Convenience constructor for the conventional SHA-512 context.
#[must_use]
pub fn standard() -> StandardEdDsa {
    EdDsa::new(Sha512Hasher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use rand_core::TryRngCore;

    #[test]
    fn keygen_then_pubkey_always_succeeds() {
        let ctx = standard();
        let mut rng = OsRng.unwrap_err();
        let sk = ctx.generate_key(&mut rng);
        let pk = ctx.get_pubkey(&sk);
        assert_eq!(pk.to_bytes().len(), 32);
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let ctx = standard();
        let mut rng = OsRng.unwrap_err();
        let sk = ctx.generate_key(&mut rng);
        let pk = ctx.get_pubkey(&sk);
        let message = b"a message worth signing";
        let sig = ctx.sign(message, &sk);
        assert!(ctx.verify(&sig, message, &pk).unwrap());
    }

    #[test]
    fn verify_fails_on_tampered_message() {
        let ctx = standard();
        let mut rng = OsRng.unwrap_err();
        let sk = ctx.generate_key(&mut rng);
        let pk = ctx.get_pubkey(&sk);
        let sig = ctx.sign(b"original", &sk);
        assert!(!ctx.verify(&sig, b"tampered", &pk).unwrap());
    }

    #[test]
    fn verify_fails_for_wrong_key() {
        let ctx = standard();
        let mut rng = OsRng.unwrap_err();
        let sk_a = ctx.generate_key(&mut rng);
        let sk_b = ctx.generate_key(&mut rng);
        let pk_b = ctx.get_pubkey(&sk_b);
        let sig = ctx.sign(b"message", &sk_a);
        assert!(!ctx.verify(&sig, b"message", &pk_b).unwrap());
    }

    #[test]
    fn shared_secret_is_commutative() {
        let ctx = standard();
        let mut rng = OsRng.unwrap_err();
        let sk_a = ctx.generate_key(&mut rng);
        let sk_b = ctx.generate_key(&mut rng);
        let pk_a = ctx.get_pubkey(&sk_a);
        let pk_b = ctx.get_pubkey(&sk_b);

        let shared_ab = ctx.get_shared_secret(&sk_a, &pk_b).unwrap();
        let shared_ba = ctx.get_shared_secret(&sk_b, &pk_a).unwrap();
        assert_eq!(shared_ab, shared_ba);
    }

    #[test]
    fn encoded_api_round_trips_through_hex() {
        let ctx = standard();
        let mut rng = OsRng.unwrap_err();
        let sk = ctx.generate_key(&mut rng);
        let sk_hex = sk.encode(Encoding::Hex);
        let sk_input = KeyInput::Encoded(&sk_hex, Encoding::Hex);

        let pk_hex = ctx.get_pubkey_encoded(sk_input, Encoding::Hex).unwrap();
        let message = b"encoded round trip";
        let sig_hex = ctx
            .sign_encoded(message, KeyInput::Encoded(&sk_hex, Encoding::Hex), Encoding::Hex)
            .unwrap();

        let ok = ctx
            .verify_encoded(
                SignatureInput::Encoded(&sig_hex, Encoding::Hex),
                message,
                PointInput::Encoded(&pk_hex, Encoding::Hex),
            )
            .unwrap();
        assert!(ok);
    }

    #[test]
    fn shared_secret_encoded_matches_structured() {
        let ctx = standard();
        let mut rng = OsRng.unwrap_err();
        let sk_a = ctx.generate_key(&mut rng);
        let sk_b = ctx.generate_key(&mut rng);
        let pk_b = ctx.get_pubkey(&sk_b);

        let structured = ctx.get_shared_secret(&sk_a, &pk_b).unwrap();
        let encoded = ctx
            .get_shared_secret_encoded(
                KeyInput::Structured(&sk_a),
                PointInput::Structured(&pk_b),
                Encoding::Base64,
            )
            .unwrap();
        assert_eq!(encoded, codec::encode(&structured, Encoding::Base64));
    }

    #[test]
    fn verify_bytes_rejects_malformed_signature() {
        let ctx = standard();
        let mut rng = OsRng.unwrap_err();
        let sk = ctx.generate_key(&mut rng);
        let pk = ctx.get_pubkey(&sk);
        let result = ctx.verify_bytes(&[0u8; 10], b"msg", &pk.to_bytes());
        assert_eq!(result.unwrap_err(), Ed25519Error::InvalidSignature);
    }

    #[test]
    fn rfc8032_test_1() {
        let ctx = standard();
        let sk = PrivateKey::from_bytes(hex_array(
            "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60",
        ));
        let expected_pk =
            hex_array("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a");
        let pk = ctx.get_pubkey(&sk);
        assert_eq!(pk.to_bytes(), expected_pk);

        let sig = ctx.sign(b"", &sk);
        let expected_sig = hex::decode(
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b",
        )
        .unwrap();
        assert_eq!(&sig.to_bytes()[..], &expected_sig[..]);
        assert!(ctx.verify(&sig, b"", &pk).unwrap());
    }

    /// One test per RFC 8032's boundary-length cases (1 byte, 2 bytes,
    /// and the 1024-byte "long message" case), each checked against a
    /// fixed sk/pk/signature triple and round-tripped through `verify`.
    #[test]
    fn sign_verify_one_byte_message() {
        let ctx = standard();
        let sk = PrivateKey::from_bytes(hex_array(
            "7de672b44cdce74c2cd6928d793c08effae8ecd372072a6e9c0ab8cb3c75724e",
        ));
        let message = [0x72u8];
        let expected_pk =
            hex_array("008b46a68de46d76ee7b0b3ca4ece7de7393014e99f68e636639e0cf3a1d9319");
        let expected_sig = hex::decode(
            "accd76903170360b027006a415370f26c0667b3078491b01255b750353dca0d4cfa1d50030dc64cb63a0b26c74d691169ec6bd09c750af59c732d7e9810a2a01",
        )
        .unwrap();

        let pk = ctx.get_pubkey(&sk);
        assert_eq!(pk.to_bytes(), expected_pk);
        let sig = ctx.sign(&message, &sk);
        assert_eq!(&sig.to_bytes()[..], &expected_sig[..]);
        assert!(ctx.verify(&sig, &message, &pk).unwrap());
    }

    #[test]
    fn sign_verify_two_byte_message() {
        let ctx = standard();
        let sk = PrivateKey::from_bytes(hex_array(
            "d46e6fed3323a49d7e6e5e38c46be3357aedaaa498968e2b96ba045b1231e916",
        ));
        let message = [0xafu8, 0x82];
        let expected_pk =
            hex_array("914e016d8b20d29c8112f24254a913db9b5a8c4d5d34cc65640713e20030a92b");
        let expected_sig = hex::decode(
            "9091003ac1352a76bb541e74bea8102f024b22cebd76c3f5a14f3f1d9ebe67a1d7138a6371037aaf0fc1aa03efef297cdf299ce56bd61382f20c8e81c8c29b02",
        )
        .unwrap();

        let pk = ctx.get_pubkey(&sk);
        assert_eq!(pk.to_bytes(), expected_pk);
        let sig = ctx.sign(&message, &sk);
        assert_eq!(&sig.to_bytes()[..], &expected_sig[..]);
        assert!(ctx.verify(&sig, &message, &pk).unwrap());
    }

    #[test]
    fn sign_verify_1024_byte_message() {
        let ctx = standard();
        let sk = PrivateKey::from_bytes(hex_array(
            "e35f5afd8cb53afd503df557dd9bb9d086e29c444035cc67ee8eca0704cded4c",
        ));
        let message: Vec<u8> = (0..1024u32).map(|i| ((i * 37 + 11) % 256) as u8).collect();
        let expected_pk =
            hex_array("177f37b3d0b9e2eb8dc0c7504049a9d43abf3167358774dcb549e4e1ef7758f5");
        let expected_sig = hex::decode(
            "db1e911d926cd35450f617c4a88a36a7772ee36b7752a804f6c880537afebb3f2da864bb9bd9694c16d453d8bb78bdf18c972578106e179bf4f76c48aa23fd0d",
        )
        .unwrap();

        let pk = ctx.get_pubkey(&sk);
        assert_eq!(pk.to_bytes(), expected_pk);
        let sig = ctx.sign(&message, &sk);
        assert_eq!(&sig.to_bytes()[..], &expected_sig[..]);
        assert!(ctx.verify(&sig, &message, &pk).unwrap());
    }

    fn hex_array(s: &str) -> [u8; 32] {
        let bytes = hex::decode(s).unwrap();
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes[..32]);
        out
    }
}

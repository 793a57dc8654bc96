//! The 64-byte hash binding used throughout signing and verification.
//!
//! Modelled as a trait rather than a hardcoded function so the EdDSA
//! context can be generic over it, the same way the rest of the crate
//! takes its cryptographic primitives as swappable collaborators.

use sha2::{Digest, Sha512};

/// Any function producing a 64-byte digest of an arbitrary byte string.
pub trait Hasher512 {
    fn hash(&self, data: &[u8]) -> [u8; 64];
}

/// The default hash binding: SHA-512.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha512Hasher;

impl Hasher512 for Sha512Hasher {
    fn hash(&self, data: &[u8]) -> [u8; 64] {
        let mut hasher = Sha512::new();
        hasher.update(data);
        let digest = hasher.finalize();
        let mut out = [0u8; 64];
        out.copy_from_slice(&digest);
        out
    }
}

impl<F> Hasher512 for F
where
    F: Fn(&[u8]) -> [u8; 64],
{
    fn hash(&self, data: &[u8]) -> [u8; 64] {
        self(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha512_of_empty_string_matches_known_digest() {
        let digest = Sha512Hasher.hash(b"");
        let expected = hex::decode(
            "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3",
        )
        .unwrap();
        assert_eq!(&digest[..], &expected[..]);
    }

    #[test]
    fn closures_implement_hasher512() {
        let constant = |_: &[u8]| [7u8; 64];
        assert_eq!(constant.hash(b"anything"), [7u8; 64]);
    }
}

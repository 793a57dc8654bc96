//! Crate-wide error type.

use thiserror::Error;

/// Everything that can go wrong decoding, validating or checking
/// Ed25519/X25519 material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ed25519Error {
    /// A string was not valid for its declared encoding, or decoded to
    /// the wrong number of bytes.
    #[error("invalid encoding for the requested codec")]
    DecodeError,

    /// A 32-byte buffer does not decompress to a point on the curve.
    #[error("bytes do not represent a valid curve point")]
    InvalidPoint,

    /// A signature is malformed (wrong length, unparseable `R`).
    #[error("signature bytes are malformed")]
    InvalidSignature,

    /// A scalar is outside its required range.
    #[error("scalar is out of the required range")]
    InvalidScalar,

    /// A key is degenerate (e.g. the X25519 ladder produced the all-zero
    /// output, meaning the peer key had low order).
    #[error("key material is invalid")]
    InvalidKey,
}

/// Crate-wide result alias.
pub type Ed25519Result<T> = Result<T, Ed25519Error>;

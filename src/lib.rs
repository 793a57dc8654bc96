//! Pure Rust Ed25519 signatures (RFC 8032) and X25519 key agreement
//! (RFC 7748) over edwards25519/Curve25519.
//!
//! The field and curve engine (modular arithmetic mod `2^255 - 19`,
//! extended twisted-Edwards point arithmetic, the Montgomery ladder,
//! and point compression) is hand-written in this crate rather than
//! delegated to a curve library. Everything around that core (hashing,
//! randomness, errors, zeroization, text encodings) leans on small,
//! focused dependencies rather than reimplementing them.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod debug;
pub mod codec;
pub mod eddsa;
pub mod error;
pub mod field;
pub mod hash;
pub mod keys;
pub mod montgomery;
pub mod point;
pub mod scalar;

pub use codec::Encoding;
pub use eddsa::{standard, EdDsa, Params, StandardEdDsa};
pub use error::{Ed25519Error, Ed25519Result};
pub use hash::{Hasher512, Sha512Hasher};
pub use keys::{KeyInput, PointInput, PrivateKey, PublicKey, Signature, SignatureInput};

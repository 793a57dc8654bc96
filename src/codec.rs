//! Text encodings for keys and signatures: raw passthrough, hex
//! (lower/upper case) and base64.

use crate::error::{Ed25519Error, Ed25519Result};

/// Which text encoding a byte buffer is represented in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Raw,
    /// Uppercase hex.
    Base16,
    /// Lowercase hex.
    Hex,
    /// Standard alphabet, `=` padded.
    Base64,
}

const LOWER_NIBBLE: &[u8; 16] = b"0123456789abcdef";
const UPPER_NIBBLE: &[u8; 16] = b"0123456789ABCDEF";

fn encode_hex(bytes: &[u8], table: &[u8; 16]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(table[(byte >> 4) as usize] as char);
        out.push(table[(byte & 0x0f) as usize] as char);
    }
    out
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn decode_hex(s: &str) -> Ed25519Result<Vec<u8>> {
    let s = s.as_bytes();
    if s.len() % 2 != 0 {
        return Err(Ed25519Error::DecodeError);
    }
    let mut out = Vec::with_capacity(s.len() / 2);
    for pair in s.chunks(2) {
        let hi = nibble(pair[0]).ok_or(Ed25519Error::DecodeError)?;
        let lo = nibble(pair[1]).ok_or(Ed25519Error::DecodeError)?;
        out.push((hi << 4) | lo);
    }
    Ok(out)
}

/// Encodes `bytes` using `encoding`. `Raw` produces no text; callers
/// wanting raw bytes should skip the codec entirely.
#[must_use]
pub fn encode(bytes: &[u8], encoding: Encoding) -> String {
    match encoding {
        Encoding::Raw => String::new(),
        Encoding::Base16 => encode_hex(bytes, UPPER_NIBBLE),
        Encoding::Hex => encode_hex(bytes, LOWER_NIBBLE),
        Encoding::Base64 => {
            use base64::Engine;
            base64::engine::general_purpose::STANDARD.encode(bytes)
        }
    }
}

/// Decodes `text` as `encoding`, validating both the alphabet and that
/// the decoded length matches `expected_len`.
///
/// # Errors
///
/// Returns [`Ed25519Error::DecodeError`] on an invalid alphabet or a
/// length mismatch.
pub fn decode(text: &str, encoding: Encoding, expected_len: usize) -> Ed25519Result<Vec<u8>> {
    let bytes = match encoding {
        Encoding::Raw => return Err(Ed25519Error::DecodeError),
        Encoding::Base16 | Encoding::Hex => decode_hex(text)?,
        Encoding::Base64 => {
            use base64::Engine;
            base64::engine::general_purpose::STANDARD
                .decode(text)
                .map_err(|_| Ed25519Error::DecodeError)?
        }
    };
    if bytes.len() != expected_len {
        return Err(Ed25519Error::DecodeError);
    }
    Ok(bytes)
}

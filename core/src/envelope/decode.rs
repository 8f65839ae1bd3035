// ## 📂 File: `src/envelope/decode.rs`
//! src/envelope/decode.rs
//!
//! Envelope parsing from the tail of an arbitrary byte stream.
//!
//! Design notes:
//! - Fixed fields are read backwards from the end; no prior knowledge of the
//!   ciphertext length is needed to recover them.
//! - Everything before the tail is returned as `body`. Splitting host bytes from
//!   ciphertext is left to the caller (`split_body`).
//! - Version compatibility is checked here so unknown formats fail early.

use crate::crypto::types::{HMAC_LEN, IV_LEN, SALT_LEN};
use crate::envelope::types::{
    EnvelopeError, Version, CIPHERTEXT_LEN_LEN, MIN_ENVELOPE_LEN, VERSION_LEN,
};

/// Tail fields of an envelope plus a borrowed view of the preceding body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEnvelope<'a> {
    pub version: Version,
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; IV_LEN],
    pub hmac: [u8; HMAC_LEN],
    pub ciphertext_len: usize,
    /// `[disguise host bytes][ciphertext]`
    pub body: &'a [u8],
}

impl<'a> ParsedEnvelope<'a> {
    /// Split the body into `(host prefix, ciphertext)` using the declared length.
    pub fn split_body(&self) -> Result<(&'a [u8], &'a [u8]), EnvelopeError> {
        if self.ciphertext_len == 0 || self.ciphertext_len > self.body.len() {
            return Err(EnvelopeError::CiphertextOutOfBounds {
                declared: self.ciphertext_len,
                body: self.body.len(),
            });
        }
        Ok(self.body.split_at(self.body.len() - self.ciphertext_len))
    }

    /// Ciphertext without the host prefix.
    pub fn ciphertext(&self) -> Result<&'a [u8], EnvelopeError> {
        self.split_body().map(|(_, ct)| ct)
    }
}

/// Parse the envelope tail of `buf`.
///
/// # Errors
/// - `BufferTooShort` if `buf` can't hold the fixed tail and an AEAD tag.
/// - `UnsupportedVersion` if the major version differs from this build's.
pub fn decode_envelope(buf: &[u8]) -> Result<ParsedEnvelope<'_>, EnvelopeError> {
    if buf.len() < MIN_ENVELOPE_LEN {
        return Err(EnvelopeError::BufferTooShort { have: buf.len(), need: MIN_ENVELOPE_LEN });
    }

    // Cursor walks from the end towards the front.
    let mut end = buf.len();
    fn take_back<const N: usize>(buf: &[u8], end: &mut usize) -> [u8; N] {
        let mut dst = [0u8; N];
        dst.copy_from_slice(&buf[*end - N..*end]);
        *end -= N;
        dst
    }

    // Reverse of encode.rs order.
    let version = Version::from_bytes(take_back::<VERSION_LEN>(buf, &mut end));
    let current = Version::current();
    if !version.is_compatible_with(&current) {
        return Err(EnvelopeError::UnsupportedVersion { have: version, need: current });
    }

    let salt = take_back::<SALT_LEN>(buf, &mut end);
    let hmac = take_back::<HMAC_LEN>(buf, &mut end);
    let iv = take_back::<IV_LEN>(buf, &mut end);
    let ciphertext_len = u32::from_le_bytes(take_back::<CIPHERTEXT_LEN_LEN>(buf, &mut end)) as usize;

    Ok(ParsedEnvelope {
        version,
        salt,
        iv,
        hmac,
        ciphertext_len,
        body: &buf[..end],
    })
}

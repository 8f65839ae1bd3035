//! crypto/mac.rs
//! HMAC-SHA256 over `ciphertext || iv`.
//!
//! The tag is recomputed on decode and compared in constant time before any
//! decryption happens.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::crypto::types::{CryptoError, HMAC_LEN};

pub type HmacSha256 = Hmac<Sha256>;

fn keyed(key: &[u8], ciphertext: &[u8], iv: &[u8]) -> Result<HmacSha256, CryptoError> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|_| CryptoError::Failure("HMAC key rejected".into()))?;
    mac.update(ciphertext);
    mac.update(iv);
    Ok(mac)
}

/// Compute the authentication tag for a ciphertext/iv pair.
pub fn compute_hmac(ciphertext: &[u8], iv: &[u8], key: &[u8]) -> Result<[u8; HMAC_LEN], CryptoError> {
    let tag = keyed(key, ciphertext, iv)?.finalize().into_bytes();
    let mut out = [0u8; HMAC_LEN];
    out.copy_from_slice(&tag);
    Ok(out)
}

/// Check a stored tag. Mismatch maps to `AuthenticationFailed`.
pub fn verify_hmac(ciphertext: &[u8], iv: &[u8], key: &[u8], tag: &[u8]) -> Result<(), CryptoError> {
    keyed(key, ciphertext, iv)?
        .verify_slice(tag)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

// ## src/crypto/kdf.rs

//! crypto/kdf.rs
//! Password-based key derivation.
//!
//! Design:
//! - PBKDF2-HMAC-SHA256(password, salt, iterations) -> 32-byte master secret
//! - HKDF-Expand(master, info) -> cipher key and MAC key (32 bytes each)
//!
//! Notes:
//! - Salt is random per encode and travels in the envelope.
//! - The iteration count is not stored; both sides take it from `CodecConfig`.
//! - The master secret never leaves this module and is zeroized after expansion.

use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::types::{CryptoError, KEY_LEN_32};

const INFO_CIPHER_KEY: &[u8] = b"cyphro|v1|cipher";
const INFO_MAC_KEY: &[u8] = b"cyphro|v1|mac";

/// Keys derived from one (password, salt) pair.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    cipher_key: [u8; KEY_LEN_32],
    mac_key: [u8; KEY_LEN_32],
}

impl KeyMaterial {
    pub fn cipher_key(&self) -> &[u8; KEY_LEN_32] {
        &self.cipher_key
    }

    pub fn mac_key(&self) -> &[u8; KEY_LEN_32] {
        &self.mac_key
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial { .. }")
    }
}

/// Derive the cipher and MAC keys for `password` and `salt`.
///
/// Deterministic: the same (password, salt, iterations) always yields the same keys.
///
/// Errors:
/// - Empty password or salt.
/// - Zero iterations.
pub fn derive_keys(
    password: &str,
    salt: &[u8],
    iterations: u32,
) -> Result<KeyMaterial, CryptoError> {
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword);
    }
    if salt.is_empty() {
        return Err(CryptoError::EmptySalt);
    }
    if iterations == 0 {
        return Err(CryptoError::InvalidIterations { have: iterations });
    }

    let mut master = [0u8; KEY_LEN_32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut master);

    let hk = Hkdf::<Sha256>::from_prk(&master)
        .map_err(|_| CryptoError::Failure("HKDF PRK rejected".into()));
    master.zeroize();
    let hk = hk?;

    let mut keys = KeyMaterial {
        cipher_key: [0u8; KEY_LEN_32],
        mac_key: [0u8; KEY_LEN_32],
    };
    hk.expand(INFO_CIPHER_KEY, &mut keys.cipher_key)
        .map_err(|_| CryptoError::Failure("HKDF expand failed (cipher key)".into()))?;
    hk.expand(INFO_MAC_KEY, &mut keys.mac_key)
        .map_err(|_| CryptoError::Failure("HKDF expand failed (mac key)".into()))?;

    Ok(keys)
}

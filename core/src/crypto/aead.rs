// ## 📂 File: `src/crypto/aead.rs`

//! src/crypto/aead.rs
//! AES-256-GCM interface used by the envelope codec.
//!
//! Design notes:
//! - 32-byte key, 12-byte IV (random per encode, stored in the envelope).
//! - The same (plaintext, key, iv, aad) always yields the same ciphertext.
//! - Tag verification fails closed; no partial plaintext is ever returned.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::crypto::types::{CryptoError, IV_LEN, KEY_LEN_32, TAG_LEN};

/// Cipher bound to one derived key.
#[derive(Clone)]
pub struct AeadImpl {
    cipher: Aes256Gcm,
}

impl AeadImpl {
    /// Construct the cipher from a derived key.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_LEN_32 {
            return Err(CryptoError::InvalidKeyLen {
                expected: KEY_LEN_32,
                actual: key.len(),
            });
        }

        let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLen {
            expected: KEY_LEN_32,
            actual: key.len(),
        })?;
        Ok(Self { cipher })
    }

    /// Encrypt `plaintext` under `iv`, binding `aad`.
    pub fn seal(&self, iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_iv(iv)?;

        self.cipher
            .encrypt(Nonce::from_slice(iv), Payload { msg: plaintext, aad })
            .map_err(|_| CryptoError::Failure("AES-GCM seal failed".into()))
    }

    /// Decrypt `ciphertext_and_tag` under `iv`, checking `aad`.
    pub fn open(
        &self,
        iv: &[u8],
        aad: &[u8],
        ciphertext_and_tag: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        check_iv(iv)?;

        if ciphertext_and_tag.len() < TAG_LEN {
            return Err(CryptoError::AuthenticationFailed);
        }

        self.cipher
            .decrypt(Nonce::from_slice(iv), Payload { msg: ciphertext_and_tag, aad })
            .map_err(|_| CryptoError::AuthenticationFailed)
    }
}

#[inline]
fn check_iv(iv: &[u8]) -> Result<(), CryptoError> {
    if iv.len() != IV_LEN {
        return Err(CryptoError::InvalidIvLen {
            expected: IV_LEN,
            actual: iv.len(),
        });
    }
    Ok(())
}

// ## 📂 File: `src/crypto/types.rs`

use std::fmt;

/// Derived key length for AES-256-GCM and HMAC-SHA256 keys.
pub const KEY_LEN_32: usize = 32;

/// PBKDF2 salt length stored in the envelope.
pub const SALT_LEN: usize = 16;

/// AES-GCM nonce length stored in the envelope as `iv`.
pub const IV_LEN: usize = 12;

/// HMAC-SHA256 tag length stored in the envelope.
pub const HMAC_LEN: usize = 32;

/// AES-GCM authentication tag appended to every ciphertext.
pub const TAG_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Password must not be empty.
    EmptyPassword,

    /// Salt must not be empty.
    EmptySalt,

    /// PBKDF2 needs at least one round.
    InvalidIterations { have: u32 },

    /// Invalid key length provided to cipher or MAC.
    InvalidKeyLen { expected: usize, actual: usize },

    /// IV length mismatch (must be 12 bytes).
    InvalidIvLen { expected: usize, actual: usize },

    /// HMAC or AEAD tag mismatch. Wrong password and tampering look the same.
    AuthenticationFailed,

    /// General derivation or runtime error with context.
    Failure(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CryptoError::*;
        match self {
            EmptyPassword =>
                write!(f, "password must not be empty"),
            EmptySalt =>
                write!(f, "salt must not be empty"),
            InvalidIterations { have } =>
                write!(f, "invalid KDF iteration count: {}", have),
            InvalidKeyLen { expected, actual } =>
                write!(f, "invalid key length: expected={}, actual={}", expected, actual),
            InvalidIvLen { expected, actual } =>
                write!(f, "invalid iv length: expected={}, actual={}", expected, actual),
            AuthenticationFailed =>
                write!(f, "authentication failed"),
            Failure(msg) =>
                write!(f, "crypto failure: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}

// ## 📂 File: `src/envelope/types.rs`

//! envelope/types.rs
//! Envelope struct, version triple and field builder.
//!
//! Layout (tail-to-head after any disguise prefix, little-endian):
//! `[ciphertext][ciphertext_len u32][iv 12][hmac 32][salt 16][version 3]`
//!
//! - Every field except the ciphertext is fixed-size and lives in the tail.
//! - A parser reads the tail backwards and treats the remainder as the body.
//! - The body is `[disguise host bytes][ciphertext]`; `ciphertext_len` splits it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::FORMAT_VERSION;
use crate::crypto::types::{HMAC_LEN, IV_LEN, SALT_LEN, TAG_LEN};

pub const VERSION_LEN: usize = 3;
pub const CIPHERTEXT_LEN_LEN: usize = 4;

/// Fixed tail size in bytes.
pub const TAIL_LEN: usize = CIPHERTEXT_LEN_LEN + IV_LEN + HMAC_LEN + SALT_LEN + VERSION_LEN;

/// Smallest byte stream that can hold an envelope (tail + one empty AEAD tag).
pub const MIN_ENVELOPE_LEN: usize = TAIL_LEN + TAG_LEN;

/// Format version: major, minor, revision (one byte each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub revision: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8, revision: u8) -> Self {
        Self { major, minor, revision }
    }

    /// Version written by this build.
    pub fn current() -> Self {
        // FORMAT_VERSION is a checked literal; see `current_version_parses` test.
        FORMAT_VERSION.parse().unwrap_or(Self::new(1, 0, 0))
    }

    pub fn to_bytes(self) -> [u8; VERSION_LEN] {
        [self.major, self.minor, self.revision]
    }

    pub fn from_bytes(b: [u8; VERSION_LEN]) -> Self {
        Self::new(b[0], b[1], b[2])
    }

    /// Files are readable across minor and revision changes only.
    pub fn is_compatible_with(&self, other: &Version) -> bool {
        self.major == other.major
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

impl FromStr for Version {
    type Err = EnvelopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = crate::utils::parse_version(s, VERSION_LEN)?;
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

/// All fields of one envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub version: Version,
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; IV_LEN],
    pub hmac: [u8; HMAC_LEN],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Total encoded length without any disguise prefix.
    pub fn encoded_len(&self) -> usize {
        self.ciphertext.len() + TAIL_LEN
    }
}

/// Collects loosely-typed fields and checks presence and sizes before building.
#[derive(Debug, Default, Clone)]
pub struct EnvelopeBuilder {
    version: Option<Version>,
    salt: Option<Vec<u8>>,
    iv: Option<Vec<u8>>,
    hmac: Option<Vec<u8>>,
    ciphertext: Option<Vec<u8>>,
}

impl EnvelopeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn salt(mut self, salt: &[u8]) -> Self {
        self.salt = Some(salt.to_vec());
        self
    }

    pub fn iv(mut self, iv: &[u8]) -> Self {
        self.iv = Some(iv.to_vec());
        self
    }

    pub fn hmac(mut self, hmac: &[u8]) -> Self {
        self.hmac = Some(hmac.to_vec());
        self
    }

    pub fn ciphertext(mut self, ciphertext: Vec<u8>) -> Self {
        self.ciphertext = Some(ciphertext);
        self
    }

    /// Fails on a missing field or a fixed field of the wrong size.
    pub fn build(self) -> Result<Envelope, EnvelopeError> {
        let version = self.version.ok_or(EnvelopeError::MissingField { field: "version" })?;
        let salt = fixed::<SALT_LEN>("salt", self.salt)?;
        let iv = fixed::<IV_LEN>("iv", self.iv)?;
        let hmac = fixed::<HMAC_LEN>("hmac", self.hmac)?;
        let ciphertext = self
            .ciphertext
            .ok_or(EnvelopeError::MissingField { field: "ciphertext" })?;

        Ok(Envelope { version, salt, iv, hmac, ciphertext })
    }
}

fn fixed<const N: usize>(field: &'static str, value: Option<Vec<u8>>) -> Result<[u8; N], EnvelopeError> {
    let value = value.ok_or(EnvelopeError::MissingField { field })?;
    value
        .as_slice()
        .try_into()
        .map_err(|_| EnvelopeError::InvalidFieldSize { field, have: value.len(), need: N })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Byte stream shorter than the fixed tail plus an AEAD tag.
    BufferTooShort { have: usize, need: usize },

    /// Required field not supplied to the builder.
    MissingField { field: &'static str },

    /// Fixed-size field with the wrong length.
    InvalidFieldSize { field: &'static str, have: usize, need: usize },

    /// Ciphertext is empty or too long for the u32 length field.
    InvalidCiphertextLen { have: usize },

    /// Declared ciphertext length doesn't fit in the body.
    CiphertextOutOfBounds { declared: usize, body: usize },

    /// Envelope written by an incompatible format version.
    UnsupportedVersion { have: Version, need: Version },

    /// Malformed version string.
    InvalidVersion(String),
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use EnvelopeError::*;
        match self {
            BufferTooShort { have, need } =>
                write!(f, "envelope buffer too short: {} < {}", have, need),
            MissingField { field } =>
                write!(f, "envelope field missing: {}", field),
            InvalidFieldSize { field, have, need } =>
                write!(f, "envelope field {} has {} bytes, expected {}", field, have, need),
            InvalidCiphertextLen { have } =>
                write!(f, "invalid ciphertext length: {}", have),
            CiphertextOutOfBounds { declared, body } =>
                write!(f, "declared ciphertext length {} exceeds body of {} bytes", declared, body),
            UnsupportedVersion { have, need } =>
                write!(f, "unsupported format version {} (this build reads {}.x.x)", have, need.major),
            InvalidVersion(msg) =>
                write!(f, "invalid version: {}", msg),
        }
    }
}

impl std::error::Error for EnvelopeError {}

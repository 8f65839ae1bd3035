use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PolicyError;
use crate::crypto::CryptoError;
use crate::disguise::PayloadError;
use crate::envelope::EnvelopeError;

/// Direction of a codec call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Encode,
    Decode,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Action::Encode => "encode",
            Action::Decode => "decode",
        })
    }
}

/// A named file moved between the caller and a worker.
///
/// `data` is reference counted, so handing a file to a worker moves a pointer, not the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferableFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl TransferableFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Coarse classification of codec failures, stable across the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Not a recognized protected file.
    Format,
    /// Wrong password, or the file was corrupted or tampered with.
    Authentication,
    /// Freshly encoded output did not decode back to the source.
    SelfVerification,
    /// Input rejected by the codec policy.
    Validation,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::Format => "format",
            ErrorKind::Authentication => "authentication",
            ErrorKind::SelfVerification => "self-verification",
            ErrorKind::Validation => "validation",
            ErrorKind::Internal => "internal",
        })
    }
}

/// Top-level codec error.
/// - `From<T>` impls let `?` lift layer errors.
/// - `kind()` is what callers branch on; the layer error stays for logs.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("envelope error: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("the file is empty")]
    EmptyInput,

    #[error("encoded output failed self-verification")]
    SelfVerification,
}

impl CodecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::Envelope(_) | CodecError::Payload(_) => ErrorKind::Format,
            CodecError::Crypto(CryptoError::AuthenticationFailed) => ErrorKind::Authentication,
            CodecError::Crypto(CryptoError::EmptyPassword) => ErrorKind::Validation,
            CodecError::Crypto(_) => ErrorKind::Internal,
            CodecError::Policy(_) | CodecError::EmptyInput => ErrorKind::Validation,
            CodecError::SelfVerification => ErrorKind::SelfVerification,
        }
    }
}

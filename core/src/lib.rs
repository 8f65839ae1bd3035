//! cyphro-core
//!
//! Password-based file protection: a versioned binary envelope, PBKDF2/HKDF key
//! derivation, AES-256-GCM with an HMAC-SHA256 tag, optional disguise behind an
//! unrelated host file, and the background workers that run it all off the
//! caller's thread.

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod constants;
pub mod types;
pub mod utils;

// Format and primitives
pub mod crypto;
pub mod disguise;
pub mod envelope;
pub mod telemetry;

// Codec
pub mod codec;

// Background work
pub mod bridge;
pub mod moderation;
pub mod pipeline;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::bridge::{BridgeError, CryptoBridge, CryptoResult};
    pub use crate::codec::{Decoded, Encoded, FileCodec};
    pub use crate::config::{AppConfig, BridgeConfig, CodecConfig, CodecPolicy, ModerationConfig};
    pub use crate::disguise::Restored;
    pub use crate::moderation::{
        Classifier, ImageDecoder, ModerationResult, ModerationService, ModerationSlot,
    };
    pub use crate::pipeline::{ProcessOutcome, Processor};
    pub use crate::types::{Action, CodecError, ErrorKind, TransferableFile};
}

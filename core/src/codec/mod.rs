//! codec/mod.rs
//! Password-protected file codec.
//!
//! `encode`: policy checks -> payload -> PBKDF2/HKDF keys -> AES-256-GCM -> HMAC
//! -> envelope after the disguise bytes -> self-verification.
//!
//! `decode` runs the same path backwards and restores name and extension.

pub mod types;
pub mod encode;
pub mod decode;
pub mod verify;

pub use types::*;

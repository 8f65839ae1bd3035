//! envelope/mod.rs
//! Binary envelope of a protected file: version, salt, iv, hmac and ciphertext.
//!
//! Notes:
//! - Fixed-size tail placed at the very end so it can be found behind any prefix.
//! - The version is the last field written; readers check it before anything else.
//! - Encoding is independent of encryption; see `crate::codec` for the full path.

pub mod types;
pub mod encode;
pub mod decode;

pub use types::*;
pub use encode::*;
pub use decode::*;

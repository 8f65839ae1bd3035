//! bridge/mod.rs
//! Request/response protocol between the caller and background workers.
//!
//! Notes:
//! - Each request carries a correlation id; a response with another id is a
//!   transport error.
//! - Crypto workers are single-use; the moderation worker lives in `crate::moderation`.
//! - Transport failures collapse into `BridgeError::Transport`, separate from codec
//!   errors reported as `BridgeError::Remote`.

pub mod error;
pub mod types;
pub mod worker;

pub use error::*;
pub use types::*;
pub use worker::*;

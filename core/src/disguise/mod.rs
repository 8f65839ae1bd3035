//! disguise/mod.rs
//! Hiding an envelope behind the bytes of an unrelated host file.
//!
//! Notes:
//! - A disguised container is `[host bytes][envelope]`; a plain one has no host bytes.
//! - Host bytes are copied verbatim and never parsed.
//! - The plaintext carries the original name only when a disguise is used, since the
//!   container name then belongs to the host file.

pub mod payload;
pub mod restore;

pub use payload::*;
pub use restore::*;

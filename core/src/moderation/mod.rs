//! moderation/mod.rs
//! Content moderation of uploaded images.
//!
//! `ModerationService` keeps one task per slot (`source`, `disguise`) and runs the
//! classifier on a long-lived worker thread. The classifier and image decoder are
//! supplied by the host.

pub mod classifier;
pub mod image;
pub mod service;
pub mod types;
pub mod worker;

pub use classifier::*;
pub use image::*;
pub use service::*;
pub use types::*;
pub use worker::*;

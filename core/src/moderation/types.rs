use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::moderation::image::Bitmap;

/// Task id, unique and increasing within one service.
pub type TaskId = u64;

/// Classification lane. At most one live task per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationSlot {
    Source,
    Disguise,
}

impl fmt::Display for ModerationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModerationSlot::Source => "source",
            ModerationSlot::Disguise => "disguise",
        })
    }
}

/// Terminal state of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum ModerationResult {
    Aborted,
    Safe,
    Unsafe,
    Error(String),
}

/// Caller -> moderation worker.
#[derive(Debug)]
pub enum ModerationRequest {
    Classify { id: TaskId, bitmap: Bitmap },
    /// Stop or ignore work for `id`.
    Abort { id: TaskId },
}

/// Moderation worker -> caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ModerationResponse {
    Result { id: TaskId, safe: bool },
    TaskError { id: TaskId, error: String },
    /// The worker is going away; every outstanding task failed.
    FatalError { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModerationError {
    #[error("No moderation slots specified")]
    NoSlots,

    #[error("No moderation started for slot \"{0}\"")]
    NotStarted(ModerationSlot),

    #[error("moderation did not finish in time")]
    Timeout,

    #[error("failed to start moderation worker: {0}")]
    Spawn(String),
}

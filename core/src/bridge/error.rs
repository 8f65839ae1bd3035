use std::time::Duration;

use thiserror::Error;

use crate::types::ErrorKind;

/// Failures of a worker round trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// No response within the hard bound. The worker may still be running.
    #[error("worker did not respond within {0:?}")]
    Timeout(Duration),

    /// Worker died, panicked, or sent something that doesn't match the request.
    #[error("worker transport error: {0}")]
    Transport(String),

    /// The worker ran the call and the codec failed.
    #[error("{message}")]
    Remote { kind: ErrorKind, message: String },
}

impl BridgeError {
    /// Codec error kind, when the failure came from the codec itself.
    pub fn remote_kind(&self) -> Option<ErrorKind> {
        match self {
            BridgeError::Remote { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

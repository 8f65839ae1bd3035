//! bridge/types.rs
//! Messages exchanged with background workers.
//!
//! Payload buffers are `Bytes`, so sending a message hands over a reference
//! count instead of copying file contents.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::disguise::Restored;
use crate::types::{Action, ErrorKind, TransferableFile};

/// Correlation id of one request.
pub type RequestId = u64;

/// One crypto call shipped to a worker.
#[derive(Clone, Serialize, Deserialize)]
pub struct CryptoRequest {
    pub id: RequestId,
    pub action: Action,
    pub source: TransferableFile,
    pub password: String,
    /// Ignored on decode.
    pub disguise: Option<TransferableFile>,
}

impl fmt::Debug for CryptoRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoRequest")
            .field("id", &self.id)
            .field("action", &self.action)
            .field("source", &self.source.name)
            .field("disguise", &self.disguise.as_ref().map(|d| &d.name))
            .finish_non_exhaustive()
    }
}

/// Successful crypto result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "kebab-case")]
pub enum CryptoResult {
    /// Container bytes and their outward name.
    Encoded { file_name: String, data: Bytes },
    Restored(Restored),
}

impl CryptoResult {
    pub fn data(&self) -> &Bytes {
        match self {
            CryptoResult::Encoded { data, .. } => data,
            CryptoResult::Restored(r) => &r.data,
        }
    }

    /// Name the result should be saved under.
    pub fn file_name(&self) -> String {
        match self {
            CryptoResult::Encoded { file_name, .. } => file_name.clone(),
            CryptoResult::Restored(r) => r.file_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CryptoResponseBody {
    Result(CryptoResult),
    Error { kind: ErrorKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoResponse {
    pub id: RequestId,
    pub body: CryptoResponseBody,
}

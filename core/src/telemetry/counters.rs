//! Mutable counters filled while a container is built or opened.

use serde::{Deserialize, Serialize};

/// Byte counts of one codec call.
#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub envelopes: u64,
    pub bytes_plaintext: u64,
    pub bytes_payload: u64,
    pub bytes_ciphertext: u64,
    pub bytes_disguise: u64,
    pub bytes_overhead: u64,
}

impl TelemetryCounters {
    /// Record one sealed or opened envelope.
    ///
    /// - `pt_len`: file data length
    /// - `payload_len`: serialized payload length (data plus name fields)
    /// - `ct_len`: ciphertext length including the GCM tag
    /// - `tail_len`: trailing envelope fields
    pub fn add_envelope(&mut self, pt_len: usize, payload_len: usize, ct_len: usize, tail_len: usize) {
        self.envelopes += 1;
        self.bytes_plaintext += pt_len as u64;
        self.bytes_payload += payload_len as u64;
        self.bytes_ciphertext += ct_len as u64;
        self.bytes_overhead += (payload_len - pt_len.min(payload_len)) as u64 + tail_len as u64;
    }

    pub fn add_disguise(&mut self, len: usize) {
        self.bytes_disguise += len as u64;
    }
}

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Frozen counters and timings of one codec call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub envelopes: u64,
    pub bytes_plaintext: u64,
    pub bytes_payload: u64,
    pub bytes_ciphertext: u64,
    pub bytes_disguise: u64,
    pub bytes_overhead: u64,
    /// Structural overhead relative to the plaintext (0 when nothing was processed).
    pub overhead_ratio: f64,
    pub throughput_plaintext_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let overhead_ratio = if counters.bytes_plaintext > 0 {
            counters.bytes_overhead as f64 / counters.bytes_plaintext as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_plaintext as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            envelopes: counters.envelopes,
            bytes_plaintext: counters.bytes_plaintext,
            bytes_payload: counters.bytes_payload,
            bytes_ciphertext: counters.bytes_ciphertext,
            bytes_disguise: counters.bytes_disguise,
            bytes_overhead: counters.bytes_overhead,
            overhead_ratio,
            throughput_plaintext_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal invariants:
    /// - ciphertext covers the payload plus the GCM tag
    /// - stage times never exceed the total elapsed time
    pub fn sanity_check(&self) -> bool {
        self.bytes_ciphertext >= self.bytes_payload
            && self.bytes_payload >= self.bytes_plaintext
            && self.total_stage_time() <= self.elapsed
    }
}
